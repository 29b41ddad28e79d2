//! Port for join request persistence.

use async_trait::async_trait;

use crate::domain::{GroupId, GroupRequest, GroupRequestId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by group request repository adapters.
    pub enum GroupRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "group request repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "group request repository query failed: {message}" as internal,
    }
}

/// Result of trying to open a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePendingOutcome {
    /// The request was stored.
    Created,
    /// No group has the requested id.
    GroupMissing,
    /// The user already has a pending request for the group.
    DuplicatePending,
    /// The user already belongs to the group.
    AlreadyMember,
}

/// Result of accepting a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The request is accepted and the requester is a member.
    Accepted(GroupRequest),
    /// The request does not exist or belongs to another group.
    NotFound,
}

/// Pending request joined with the group fields shown to masters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequestRecord {
    /// The pending request.
    pub request: GroupRequest,
    /// Name of the requested group.
    pub group_name: String,
    /// Master of the requested group.
    pub group_master: UserId,
}

/// Port for join request persistence.
///
/// `create_pending` and `accept` are single atomic units: the duplicate and
/// membership checks cannot interleave with another insert for the same
/// pair, and an accepted request is never visible without the membership it
/// grants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRequestRepository: Send + Sync {
    /// Store `request` as pending unless a guard refuses it.
    async fn create_pending(
        &self,
        request: &GroupRequest,
    ) -> Result<CreatePendingOutcome, GroupRequestRepositoryError>;

    /// Find a request by id.
    async fn find_by_id(
        &self,
        id: &GroupRequestId,
    ) -> Result<Option<GroupRequest>, GroupRequestRepositoryError>;

    /// Mark a request accepted and admit its requester to the group.
    ///
    /// Accepting an accepted request keeps its status and re-admits the
    /// requester if they have since left.
    async fn accept(
        &self,
        group_id: &GroupId,
        id: &GroupRequestId,
    ) -> Result<AcceptOutcome, GroupRequestRepositoryError>;

    /// Delete a request belonging to `group_id`. Returns `false` when absent.
    async fn delete(
        &self,
        group_id: &GroupId,
        id: &GroupRequestId,
    ) -> Result<bool, GroupRequestRepositoryError>;

    /// Pending requests for every group mastered by `master`, ordered by
    /// creation then id.
    async fn list_pending_for_master(
        &self,
        master: &UserId,
    ) -> Result<Vec<PendingRequestRecord>, GroupRequestRepositoryError>;
}
