//! Driving ports for the join request lifecycle.

use async_trait::async_trait;

use crate::domain::{Error, GroupId, GroupRequest, GroupRequestId, User, UserId};

/// Identifies a request inside its group on behalf of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRequestAction {
    /// Authenticated caller; must be the group master.
    pub actor: UserId,
    /// Group named in the path.
    pub group_id: GroupId,
    /// Request named in the path.
    pub request_id: GroupRequestId,
}

/// Pending request enriched for the master's inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRequestView {
    /// The pending request.
    pub request: GroupRequest,
    /// Name of the requested group.
    pub group_name: String,
    /// Master of the requested group.
    pub group_master: UserId,
    /// Requesting account, if it still resolves.
    pub requester: Option<User>,
}

/// Driving port for join request writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRequestCommand: Send + Sync {
    /// Ask to join a group as the caller.
    async fn create_request(&self, actor: UserId, group_id: GroupId)
    -> Result<GroupRequest, Error>;

    /// Accept a request, admitting its requester.
    async fn accept_request(&self, action: GroupRequestAction) -> Result<GroupRequest, Error>;

    /// Reject a request by deleting it.
    async fn reject_request(&self, action: GroupRequestAction) -> Result<(), Error>;
}

/// Driving port for join request reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRequestQuery: Send + Sync {
    /// Pending requests across every group mastered by `master`.
    async fn list_requests(&self, master: UserId) -> Result<Vec<GroupRequestView>, Error>;
}
