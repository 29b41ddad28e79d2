//! Join requests and their lifecycle.
//!
//! A request starts `PENDING` and either becomes `ACCEPTED`, at which point
//! the requester joins the group, or is deleted outright on rejection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifier::uuid_identifier;
use super::{GroupId, UserId};

uuid_identifier!(
    /// Stable join request identifier.
    GroupRequestId
);

/// Persisted lifecycle state of a join request.
///
/// Rejection deletes the request, so there is no rejected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupRequestStatus {
    /// Awaiting a decision from the group master.
    Pending,
    /// Approved; the requester is a member.
    Accepted,
}

impl GroupRequestStatus {
    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
        }
    }
}

impl fmt::Display for GroupRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown group request status: {0}")]
pub struct UnknownStatusError(pub String);

impl FromStr for GroupRequestStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// A user's request to join a group.
///
/// # Examples
/// ```
/// use backend::domain::{GroupId, GroupRequest, GroupRequestStatus, UserId};
///
/// let request = GroupRequest::pending(GroupId::random(), UserId::random(), chrono::Utc::now());
/// assert_eq!(request.status(), GroupRequestStatus::Pending);
/// assert_eq!(request.accept().status(), GroupRequestStatus::Accepted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    id: GroupRequestId,
    group_id: GroupId,
    user_id: UserId,
    status: GroupRequestStatus,
    created_at: DateTime<Utc>,
}

impl GroupRequest {
    /// Open a new pending request with a fresh identifier.
    #[must_use]
    pub fn pending(group_id: GroupId, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self::new(
            GroupRequestId::random(),
            group_id,
            user_id,
            GroupRequestStatus::Pending,
            created_at,
        )
    }

    /// Assemble a request from stored parts.
    #[must_use]
    pub const fn new(
        id: GroupRequestId,
        group_id: GroupId,
        user_id: UserId,
        status: GroupRequestStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            user_id,
            status,
            created_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &GroupRequestId {
        &self.id
    }

    /// Group the requester wants to join.
    #[must_use]
    pub const fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    /// Requesting user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> GroupRequestStatus {
        self.status
    }

    /// Creation instant used for list ordering.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the request still awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == GroupRequestStatus::Pending
    }

    /// Whether the request belongs to `group_id`.
    #[must_use]
    pub fn belongs_to(&self, group_id: &GroupId) -> bool {
        self.group_id == *group_id
    }

    /// Transition to accepted. Accepting twice is a no-op.
    #[must_use]
    pub const fn accept(self) -> Self {
        Self {
            status: GroupRequestStatus::Accepted,
            ..self
        }
    }
}
