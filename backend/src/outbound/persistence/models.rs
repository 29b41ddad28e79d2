//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{group_members, group_requests, groups, password_reset_tokens, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub avatar: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Changeset for profile updates.
///
/// `avatar` is always written so a cleared avatar is persisted as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub avatar: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Row struct for reading from the groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub location: String,
    pub chronic: String,
    pub master: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new groups.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub(crate) struct NewGroupRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub location: &'a str,
    pub chronic: &'a str,
    pub master: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Changeset replacing every text attribute of a group.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = groups)]
pub(crate) struct GroupDetailsUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub location: &'a str,
    pub chronic: &'a str,
}

/// Insertable membership row; `position` is assigned by the database.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = group_members)]
pub(crate) struct NewMemberRow {
    pub group_id: Uuid,
    pub user_id: Uuid,
}

// ---------------------------------------------------------------------------
// Group requests
// ---------------------------------------------------------------------------

/// Join request row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = group_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRequestRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Password reset tokens
// ---------------------------------------------------------------------------

/// Reset token row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = password_reset_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PasswordResetTokenRow {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
