//! Driving port for group and membership mutations.

use async_trait::async_trait;

use crate::domain::{Error, GroupDetails, GroupDetailsPatch, GroupId, UserId};

use super::GroupView;

/// Request to found a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupRequest {
    /// Authenticated caller.
    pub actor: UserId,
    /// Declared master; must be the caller.
    pub master: UserId,
    /// Validated attributes.
    pub details: GroupDetails,
}

/// Request to change a group's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGroupRequest {
    /// Authenticated caller.
    pub actor: UserId,
    /// Target group.
    pub group_id: GroupId,
    /// Attributes to replace.
    pub patch: GroupDetailsPatch,
}

/// Request to remove a member from a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveMemberRequest {
    /// Authenticated caller; the master or the member leaving.
    pub actor: UserId,
    /// Target group.
    pub group_id: GroupId,
    /// Member to remove.
    pub user_id: UserId,
}

/// Driving port for group writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupCommand: Send + Sync {
    /// Found a group with the caller enrolled as master.
    async fn create_group(&self, request: CreateGroupRequest) -> Result<GroupView, Error>;

    /// Replace the provided attributes. Master only.
    async fn update_group(&self, request: UpdateGroupRequest) -> Result<GroupView, Error>;

    /// Delete a group with its memberships and requests. Master only.
    async fn delete_group(&self, actor: UserId, group_id: GroupId) -> Result<(), Error>;

    /// Remove a member. The master can never be removed.
    async fn remove_member(&self, request: RemoveMemberRequest) -> Result<(), Error>;
}
