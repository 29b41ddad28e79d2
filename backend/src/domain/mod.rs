//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities for users, groups, join
//! requests and password reset tokens, plus the services that implement the
//! driving ports. Keep types free of transport and persistence concerns and
//! document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Group and Membership: groups and their master-preserving member sets.
//! - GroupRequest: join requests and their lifecycle.
//! - PasswordResetToken: single-use, time-bounded recovery tokens.
//! - User: registered account identity.

pub mod auth;
pub mod error;
pub mod group;
pub mod group_request;
mod group_request_service;
mod group_service;
mod identifier;
pub mod password_reset;
mod password_reset_service;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_account_service;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, Password, PasswordHash,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::group::{
    Group, GroupDetails, GroupDetailsPatch, GroupField, GroupFields, GroupId,
    GroupValidationError, Membership, MembershipChange, MembershipDelta, MembershipError,
};
pub use self::group_request::{
    GroupRequest, GroupRequestId, GroupRequestStatus, UnknownStatusError,
};
pub use self::group_request_service::GroupRequestService;
pub use self::group_service::GroupService;
pub use self::password_reset::{
    PasswordResetToken, RESET_TOKEN_LENGTH, RESET_TOKEN_TTL, ResetToken,
};
pub use self::password_reset_service::{PasswordResetService, RECOVERY_SUBJECT};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AvatarUrl, EmailAddress, USERNAME_MAX, User, UserId, UserValidationError, Username,
};
pub use self::user_account_service::UserAccountService;
