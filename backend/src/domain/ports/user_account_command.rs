//! Driving port for account registration and profile updates.

use async_trait::async_trait;

use crate::domain::{AvatarUrl, EmailAddress, Error, Password, User, UserId, Username};

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    /// Requested public handle.
    pub username: Username,
    /// Sign-in address.
    pub email: EmailAddress,
    /// Chosen password.
    pub password: Password,
    /// Optional avatar link.
    pub avatar: Option<AvatarUrl>,
}

/// Validated profile update; absent fields stay unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    /// Authenticated caller.
    pub actor: UserId,
    /// Account to update.
    pub user_id: UserId,
    /// Replacement address.
    pub email: Option<EmailAddress>,
    /// Replacement password.
    pub password: Option<Password>,
    /// Replacement avatar.
    pub avatar: Option<AvatarUrl>,
}

/// Driving port for account writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountCommand: Send + Sync {
    /// Create an account. Duplicate email or username fails with a conflict
    /// naming the field.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Update the caller's own account.
    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Error>;
}
