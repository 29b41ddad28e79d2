//! Driving port for account recovery.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, Password, ResetToken};

/// Request to mail a reset link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTokenRequest {
    /// Address the account was registered with.
    pub email: EmailAddress,
    /// Page the link should open; the token is appended as `?token=`.
    pub reset_password_url: String,
}

/// Request to redeem a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordRequest {
    /// Token from the mailed link.
    pub token: ResetToken,
    /// Replacement password.
    pub password: Password,
}

/// Driving port for password recovery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetCommand: Send + Sync {
    /// Issue a token and mail it. Unknown addresses succeed silently.
    async fn issue_token(&self, request: IssueTokenRequest) -> Result<(), Error>;

    /// Redeem a token, replacing the owner's password.
    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error>;
}
