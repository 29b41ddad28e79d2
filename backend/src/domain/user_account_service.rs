//! Account services: registration, profile updates and login.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    LoginService, PasswordHasher, RegisterUserRequest, UpdateUserRequest, UserAccountCommand,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Error, LoginCredentials, User, UserId};

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("{field} already in use"))
                .with_details(serde_json::json!({ "field": field, "code": "duplicate" }))
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Account service implementing [`UserAccountCommand`] and [`LoginService`].
#[derive(Clone)]
pub struct UserAccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserAccountService<U, H> {
    /// Create a new service over the user repository and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> UserAccountCommand for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let RegisterUserRequest {
            username,
            email,
            password,
            avatar,
        } = request;
        let hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(Error::from)?;
        let user = User::new(UserId::random(), username, email, avatar);
        self.users
            .create(&user, hash)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Error> {
        let UpdateUserRequest {
            actor,
            user_id,
            email,
            password,
            avatar,
        } = request;
        if actor != user_id {
            return Err(Error::forbidden("you can only update your own account"));
        }

        let current = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        let hash = match password {
            Some(password) => Some(
                self.hasher
                    .hash(&password)
                    .await
                    .map_err(Error::from)?,
            ),
            None => None,
        };

        let updated = current.with_profile(email, avatar);
        let found = self
            .users
            .update(&updated, hash)
            .await
            .map_err(map_user_repository_error)?;
        if !found {
            return Err(Error::not_found(format!("user {user_id} not found")));
        }
        Ok(updated)
    }
}

#[async_trait]
impl<U, H> LoginService for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(invalid_credentials());
        };
        let Some(hash) = self
            .users
            .find_password_hash(user.id())
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &hash)
            .await
            .map_err(Error::from)?;
        if !verified {
            return Err(invalid_credentials());
        }
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
