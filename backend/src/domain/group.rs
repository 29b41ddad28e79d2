//! Roleplay groups and their membership sets.
//!
//! A group is owned by its master, who is enrolled as the first member when
//! the group is founded and can never leave through a membership change.
//! [`Membership::apply`] is the only code path that admits or removes
//! members, so every adapter that persists membership funnels its changes
//! through it.

use chrono::{DateTime, Utc};

use super::UserId;
use super::identifier::uuid_identifier;

uuid_identifier!(
    /// Stable group identifier.
    GroupId
);

/// Text attributes carried by every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    /// Display name.
    Name,
    /// Free-form description.
    Description,
    /// When the group plays.
    Schedule,
    /// Where the group plays.
    Location,
    /// Campaign chronicle.
    Chronic,
}

impl GroupField {
    /// Every field in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Description,
        Self::Schedule,
        Self::Location,
        Self::Chronic,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Schedule => "schedule",
            Self::Location => "location",
            Self::Chronic => "chronic",
        }
    }
}

/// Validation errors raised when building group attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    /// A required attribute was not supplied.
    #[error("{} is required", field.as_str())]
    MissingField {
        /// Offending attribute.
        field: GroupField,
    },
    /// An attribute was supplied but blank.
    #[error("{} must not be empty", field.as_str())]
    EmptyField {
        /// Offending attribute.
        field: GroupField,
    },
}

impl GroupValidationError {
    /// Attribute the error refers to.
    #[must_use]
    pub const fn field(self) -> GroupField {
        match self {
            Self::MissingField { field } | Self::EmptyField { field } => field,
        }
    }
}

/// Raw, optional group attributes as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFields {
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// When the group plays.
    pub schedule: Option<String>,
    /// Where the group plays.
    pub location: Option<String>,
    /// Campaign chronicle.
    pub chronic: Option<String>,
}

impl GroupFields {
    fn take(&mut self, field: GroupField) -> Option<String> {
        match field {
            GroupField::Name => self.name.take(),
            GroupField::Description => self.description.take(),
            GroupField::Schedule => self.schedule.take(),
            GroupField::Location => self.location.take(),
            GroupField::Chronic => self.chronic.take(),
        }
    }
}

fn non_empty(field: GroupField, value: String) -> Result<String, GroupValidationError> {
    if value.trim().is_empty() {
        return Err(GroupValidationError::EmptyField { field });
    }
    Ok(value)
}

/// Complete, validated group attributes.
///
/// ## Invariants
/// - Every attribute is non-empty once trimmed.
///
/// # Examples
/// ```
/// use backend::domain::{GroupDetails, GroupFields};
///
/// let details = GroupDetails::try_from_fields(GroupFields {
///     name: Some("Night Owls".into()),
///     description: Some("Weekly vampire chronicle".into()),
///     schedule: Some("Fridays".into()),
///     location: Some("Lisbon".into()),
///     chronic: Some("By Night".into()),
/// })
/// .expect("complete attributes");
/// assert_eq!(details.name(), "Night Owls");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetails {
    name: String,
    description: String,
    schedule: String,
    location: String,
    chronic: String,
}

impl GroupDetails {
    /// Validate a full attribute set.
    ///
    /// # Errors
    /// Returns the first missing or blank attribute in declaration order.
    pub fn try_from_fields(mut fields: GroupFields) -> Result<Self, GroupValidationError> {
        let mut require = |field: GroupField| {
            fields
                .take(field)
                .ok_or(GroupValidationError::MissingField { field })
                .and_then(|value| non_empty(field, value))
        };
        Ok(Self {
            name: require(GroupField::Name)?,
            description: require(GroupField::Description)?,
            schedule: require(GroupField::Schedule)?,
            location: require(GroupField::Location)?,
            chronic: require(GroupField::Chronic)?,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the group plays.
    #[must_use]
    pub fn schedule(&self) -> &str {
        &self.schedule
    }

    /// Where the group plays.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Campaign chronicle.
    #[must_use]
    pub fn chronic(&self) -> &str {
        &self.chronic
    }

    /// Replace only the attributes present in `patch`.
    #[must_use]
    pub fn patched(self, patch: GroupDetailsPatch) -> Self {
        Self {
            name: patch.name.unwrap_or(self.name),
            description: patch.description.unwrap_or(self.description),
            schedule: patch.schedule.unwrap_or(self.schedule),
            location: patch.location.unwrap_or(self.location),
            chronic: patch.chronic.unwrap_or(self.chronic),
        }
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Validated partial attribute update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDetailsPatch {
    name: Option<String>,
    description: Option<String>,
    schedule: Option<String>,
    location: Option<String>,
    chronic: Option<String>,
}

impl GroupDetailsPatch {
    /// Validate the supplied attributes; absent ones stay untouched.
    ///
    /// # Errors
    /// Returns [`GroupValidationError::EmptyField`] for a blank attribute.
    pub fn try_from_fields(mut fields: GroupFields) -> Result<Self, GroupValidationError> {
        let mut optional = |field: GroupField| {
            fields
                .take(field)
                .map(|value| non_empty(field, value))
                .transpose()
        };
        Ok(Self {
            name: optional(GroupField::Name)?,
            description: optional(GroupField::Description)?,
            schedule: optional(GroupField::Schedule)?,
            location: optional(GroupField::Location)?,
            chronic: optional(GroupField::Chronic)?,
        })
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.schedule.is_none()
            && self.location.is_none()
            && self.chronic.is_none()
    }
}

/// Requested change to a membership set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// Enrol a user.
    Admit(UserId),
    /// Remove a user who is not the master.
    Remove(UserId),
}

/// Effect of an applied [`MembershipChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipDelta {
    /// The user was enrolled.
    Admitted(UserId),
    /// The user was already enrolled; nothing changed.
    Unchanged(UserId),
    /// The user was removed.
    Removed(UserId),
}

/// Reasons a membership change or restore is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MembershipError {
    /// The master cannot be removed from their own group.
    #[error("the group master cannot be removed")]
    MasterRemoval,
    /// The user is not a member of the group.
    #[error("user is not a member of the group")]
    NotAMember,
    /// A stored member list did not include the master.
    #[error("stored membership is missing the group master")]
    MasterMissing,
}

/// Insertion-ordered set of members that always contains the master.
///
/// # Examples
/// ```
/// use backend::domain::{Membership, MembershipChange, MembershipError, UserId};
///
/// let master = UserId::random();
/// let mut members = Membership::founded_by(master);
/// assert_eq!(
///     members.apply(MembershipChange::Remove(master)),
///     Err(MembershipError::MasterRemoval),
/// );
/// assert!(members.contains(&master));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    master: UserId,
    members: Vec<UserId>,
}

impl Membership {
    /// Start a membership set with the master as its only member.
    #[must_use]
    pub fn founded_by(master: UserId) -> Self {
        Self {
            master,
            members: vec![master],
        }
    }

    /// Rebuild a membership set loaded from storage.
    ///
    /// Duplicate entries are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    /// Returns [`MembershipError::MasterMissing`] when `members` does not
    /// contain `master`.
    pub fn restore(master: UserId, members: Vec<UserId>) -> Result<Self, MembershipError> {
        if !members.contains(&master) {
            return Err(MembershipError::MasterMissing);
        }
        let mut unique = Vec::with_capacity(members.len());
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        Ok(Self {
            master,
            members: unique,
        })
    }

    /// Owner of the group.
    #[must_use]
    pub const fn master(&self) -> &UserId {
        &self.master
    }

    /// Members in join order; the master is always present.
    #[must_use]
    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    /// Whether `user` is enrolled.
    #[must_use]
    pub fn contains(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Apply a change, refusing anything that would drop the master.
    ///
    /// Admitting an existing member is a no-op reported as
    /// [`MembershipDelta::Unchanged`].
    ///
    /// # Errors
    /// [`MembershipError::MasterRemoval`] when removing the master and
    /// [`MembershipError::NotAMember`] when removing someone not enrolled.
    pub fn apply(&mut self, change: MembershipChange) -> Result<MembershipDelta, MembershipError> {
        match change {
            MembershipChange::Admit(user) => {
                if self.contains(&user) {
                    return Ok(MembershipDelta::Unchanged(user));
                }
                self.members.push(user);
                Ok(MembershipDelta::Admitted(user))
            }
            MembershipChange::Remove(user) => {
                if user == self.master {
                    return Err(MembershipError::MasterRemoval);
                }
                let before = self.members.len();
                self.members.retain(|member| *member != user);
                if self.members.len() == before {
                    return Err(MembershipError::NotAMember);
                }
                Ok(MembershipDelta::Removed(user))
            }
        }
    }
}

/// A roleplay group with its attributes and members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    details: GroupDetails,
    membership: Membership,
    created_at: DateTime<Utc>,
}

impl Group {
    /// Found a new group with `master` enrolled as the first member.
    #[must_use]
    pub fn found(
        id: GroupId,
        details: GroupDetails,
        master: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, details, Membership::founded_by(master), created_at)
    }

    /// Assemble a group from stored parts.
    #[must_use]
    pub const fn new(
        id: GroupId,
        details: GroupDetails,
        membership: Membership,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            membership,
            created_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &GroupId {
        &self.id
    }

    /// Owner of the group.
    #[must_use]
    pub const fn master(&self) -> &UserId {
        self.membership.master()
    }

    /// Text attributes.
    #[must_use]
    pub const fn details(&self) -> &GroupDetails {
        &self.details
    }

    /// Membership set.
    #[must_use]
    pub const fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Mutable membership set, only reachable through [`Membership::apply`].
    pub const fn membership_mut(&mut self) -> &mut Membership {
        &mut self.membership
    }

    /// Creation instant used for list ordering.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the attributes present in `patch`.
    #[must_use]
    pub fn with_details_patch(self, patch: GroupDetailsPatch) -> Self {
        Self {
            details: self.details.patched(patch),
            ..self
        }
    }
}

#[cfg(test)]
mod tests;
