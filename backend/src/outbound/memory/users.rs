//! [`UserRepository`] over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, User, UserId};

use super::{MemoryStore, Tables, UserRow};

fn ensure_unique(tables: &Tables, user: &User) -> Result<(), UserPersistenceError> {
    let others = tables.users.values().filter(|row| row.user.id() != user.id());
    for row in others {
        if row.user.email() == user.email() {
            return Err(UserPersistenceError::duplicate("email"));
        }
        if row.user.username() == user.username() {
            return Err(UserPersistenceError::duplicate("username"));
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(
        &self,
        user: &User,
        password_hash: PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables().map_err(UserPersistenceError::query)?;
        if tables.users.contains_key(user.id()) {
            return Err(UserPersistenceError::duplicate("id"));
        }
        ensure_unique(&tables, user)?;
        tables.users.insert(
            *user.id(),
            UserRow {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserPersistenceError> {
        let mut tables = self.tables().map_err(UserPersistenceError::query)?;
        if !tables.users.contains_key(user.id()) {
            return Ok(false);
        }
        ensure_unique(&tables, user)?;
        let Some(row) = tables.users.get_mut(user.id()) else {
            return Ok(false);
        };
        row.user = user.clone();
        if let Some(hash) = password_hash {
            row.password_hash = hash;
        }
        Ok(true)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).map(|row| row.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .find(|row| row.user.email() == email)
            .map(|row| row.user.clone()))
    }

    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        let tables = self.tables().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).map(|row| row.password_hash.clone()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.tables().map_err(UserPersistenceError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .map(|row| row.user.clone())
            .collect())
    }
}
