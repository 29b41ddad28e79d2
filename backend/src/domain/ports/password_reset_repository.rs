//! Port for password reset token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PasswordHash, PasswordResetToken, ResetToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password reset repository adapters.
    pub enum PasswordResetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "password reset repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "password reset repository query failed: {message}" as internal,
    }
}

/// Result of redeeming a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// The owner's password was replaced and the token deleted.
    Redeemed(UserId),
    /// The token does not exist or was already consumed.
    Missing,
    /// The token exists but is past its validity window; it is kept.
    Expired,
}

/// Port for reset token storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Store a freshly issued token.
    async fn insert(&self, token: &PasswordResetToken)
    -> Result<(), PasswordResetRepositoryError>;

    /// Find a token by its text.
    async fn find(
        &self,
        token: &ResetToken,
    ) -> Result<Option<PasswordResetToken>, PasswordResetRepositoryError>;

    /// Consume a token: re-check existence and expiry at `now`, replace the
    /// owner's password hash, and delete the token in one atomic unit.
    async fn redeem(
        &self,
        token: &ResetToken,
        now: DateTime<Utc>,
        password_hash: PasswordHash,
    ) -> Result<RedeemOutcome, PasswordResetRepositoryError>;
}
