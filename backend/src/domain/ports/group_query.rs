//! Driving port for group reads.
//!
//! Listings have two shapes: an unfiltered listing returns every group as a
//! flat sequence, while any `user` or `text` filter returns a paginated
//! envelope. [`GroupListing`] keeps both shapes explicit.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, Group, GroupId, User};

/// A group enriched with its master and member identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    /// The group itself.
    pub group: Group,
    /// Master's account, if it still resolves.
    pub master: Option<User>,
    /// Member accounts in join order.
    pub players: Vec<User>,
}

/// Filters accepted by [`GroupQuery::list_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroupsRequest {
    /// Raw `user` filter; a value that is not a UUID matches nothing.
    pub user: Option<String>,
    /// Raw `text` filter; blank counts as absent.
    pub text: Option<String>,
    /// Page to return when the listing is paginated.
    pub page: PageRequest,
}

/// Listing result, flat when unfiltered and paginated otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupListing {
    /// Every group, ordered by creation then id.
    All(Vec<GroupView>),
    /// One page of the filtered groups.
    Page(Paginated<GroupView>),
}

/// Driving port for group reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupQuery: Send + Sync {
    /// Read one group with its members.
    async fn get_group(&self, group_id: GroupId) -> Result<GroupView, Error>;

    /// List groups, flat or paginated depending on the filters.
    async fn list_groups(&self, request: ListGroupsRequest) -> Result<GroupListing, Error>;
}
