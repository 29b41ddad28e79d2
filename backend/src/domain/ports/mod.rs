//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, mail) are implemented by outbound
//! adapters; driving ports (commands, queries, login) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod group_command;
mod group_query;
mod group_repository;
mod group_request_command;
mod group_request_repository;
mod login_service;
mod mailer;
mod password_hasher;
mod password_reset_command;
mod password_reset_repository;
mod user_account_command;
mod user_repository;

#[cfg(test)]
pub use group_command::MockGroupCommand;
pub use group_command::{
    CreateGroupRequest, GroupCommand, RemoveMemberRequest, UpdateGroupRequest,
};
#[cfg(test)]
pub use group_query::MockGroupQuery;
pub use group_query::{GroupListing, GroupQuery, GroupView, ListGroupsRequest};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{
    GroupFilter, GroupPage, GroupRepository, GroupRepositoryError, MembershipOutcome,
};
pub use group_request_command::{
    GroupRequestAction, GroupRequestCommand, GroupRequestQuery, GroupRequestView,
};
#[cfg(test)]
pub use group_request_command::{MockGroupRequestCommand, MockGroupRequestQuery};
#[cfg(test)]
pub use group_request_repository::MockGroupRequestRepository;
pub use group_request_repository::{
    AcceptOutcome, CreatePendingOutcome, GroupRequestRepository, GroupRequestRepositoryError,
    PendingRequestRecord,
};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{MailMessage, Mailer, MailerError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use password_reset_command::MockPasswordResetCommand;
pub use password_reset_command::{IssueTokenRequest, PasswordResetCommand, ResetPasswordRequest};
#[cfg(test)]
pub use password_reset_repository::MockPasswordResetRepository;
pub use password_reset_repository::{
    PasswordResetRepository, PasswordResetRepositoryError, RedeemOutcome,
};
#[cfg(test)]
pub use user_account_command::MockUserAccountCommand;
pub use user_account_command::{RegisterUserRequest, UpdateUserRequest, UserAccountCommand};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
