//! Port for group and membership persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Group, GroupDetails, GroupId, MembershipChange, MembershipDelta, MembershipError, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "group repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "group repository query failed: {message}" as internal,
    }
}

/// Narrowing applied to paginated group listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    /// Only groups this user belongs to, as master or member.
    pub member: Option<UserId>,
    /// Lower-cased substring matched against name or description.
    pub text: Option<String>,
}

impl GroupFilter {
    /// Whether `group` passes the filter.
    #[must_use]
    pub fn matches(&self, group: &Group) -> bool {
        let member_ok = self
            .member
            .is_none_or(|user| group.membership().contains(&user));
        let text_ok = self
            .text
            .as_deref()
            .is_none_or(|needle| group.details().matches_text(needle));
        member_ok && text_ok
    }
}

/// One page of groups plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPage {
    /// Groups on the requested page, ordered by creation then id.
    pub groups: Vec<Group>,
    /// Number of groups matching the filter across all pages.
    pub total: u64,
}

/// Result of routing a [`MembershipChange`] through the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// The change was applied and persisted.
    Applied(MembershipDelta),
    /// No group has the given id.
    GroupMissing,
    /// The membership set refused the change.
    Refused(MembershipError),
}

/// Port for group persistence.
///
/// Every method is one atomic unit. Membership changes load the stored
/// membership, apply the change through
/// [`crate::domain::Membership::apply`], and persist the resulting delta
/// without another writer interleaving.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Persist a newly founded group together with its membership rows.
    async fn create(&self, group: &Group) -> Result<(), GroupRepositoryError>;

    /// Find a group with its members.
    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupRepositoryError>;

    /// Replace a group's text attributes. Returns `false` when absent.
    async fn update_details(
        &self,
        id: &GroupId,
        details: &GroupDetails,
    ) -> Result<bool, GroupRepositoryError>;

    /// Delete a group, its memberships and its join requests.
    ///
    /// Returns `false` when absent.
    async fn delete(&self, id: &GroupId) -> Result<bool, GroupRepositoryError>;

    /// Apply a membership change atomically.
    async fn change_membership(
        &self,
        id: &GroupId,
        change: MembershipChange,
    ) -> Result<MembershipOutcome, GroupRepositoryError>;

    /// Every group ordered by creation then id.
    async fn list_all(&self) -> Result<Vec<Group>, GroupRepositoryError>;

    /// One page of the groups matching `filter`, ordered by creation then id.
    async fn list_page(
        &self,
        filter: &GroupFilter,
        page: PageRequest,
    ) -> Result<GroupPage, GroupRepositoryError>;
}
