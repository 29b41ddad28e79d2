//! Single-use, time-bounded password reset tokens.
//!
//! A token is usable while its age is at most [`RESET_TOKEN_TTL`]; consuming
//! it deletes it. Expired tokens stay stored so callers can tell an expired
//! token apart from one that never existed or was already used.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, distributions::Alphanumeric};

use super::UserId;

/// Number of characters in a generated token.
pub const RESET_TOKEN_LENGTH: usize = 48;

/// Validity window measured from the token's creation instant.
pub const RESET_TOKEN_TTL: TimeDelta = TimeDelta::hours(2);

/// Opaque token string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResetToken(String);

impl ResetToken {
    /// Generate a random alphanumeric token.
    #[must_use]
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Wrap a token presented by a caller.
    ///
    /// Returns `None` for blank input, which can never match a stored token.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetToken(**redacted**)")
    }
}

/// Stored reset token owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    token: ResetToken,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Assemble a token record.
    #[must_use]
    pub const fn new(token: ResetToken, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at,
        }
    }

    /// Token text.
    #[must_use]
    pub const fn token(&self) -> &ResetToken {
        &self.token
    }

    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Issue instant.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the token is past its validity window at `now`.
    ///
    /// An age of exactly [`RESET_TOKEN_TTL`] is still usable.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{PasswordResetToken, RESET_TOKEN_TTL, ResetToken, UserId};
    /// use chrono::{TimeDelta, Utc};
    ///
    /// let issued = Utc::now();
    /// let token = PasswordResetToken::new(ResetToken::generate(), UserId::random(), issued);
    /// assert!(!token.is_expired_at(issued + RESET_TOKEN_TTL));
    /// assert!(token.is_expired_at(issued + RESET_TOKEN_TTL + TimeDelta::seconds(1)));
    /// ```
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) > RESET_TOKEN_TTL
    }
}
