//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the submitted value.
        Duplicate { field: String } => "{field} already in use",
    }
}

/// Port for reading and writing user accounts.
///
/// Adapters enforce case-insensitive uniqueness of email and username and
/// report violations as [`UserPersistenceError::Duplicate`] naming the column.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn create(
        &self,
        user: &User,
        password_hash: PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Overwrite profile fields and optionally the password hash.
    ///
    /// Returns `false` when no account has the user's id.
    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the stored password hash for a user.
    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError>;

    /// Fetch every user whose id appears in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_error_names_the_field() {
        let err = UserPersistenceError::duplicate("email");
        assert_eq!(err.to_string(), "email already in use");
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = UserPersistenceError::connection("refused");
        assert!(err.to_string().contains("refused"));
    }
}
