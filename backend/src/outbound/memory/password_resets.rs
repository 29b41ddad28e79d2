//! [`PasswordResetRepository`] over the in-memory tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{PasswordResetRepository, PasswordResetRepositoryError, RedeemOutcome};
use crate::domain::{PasswordHash, PasswordResetToken, ResetToken};

use super::MemoryStore;

#[async_trait]
impl PasswordResetRepository for MemoryStore {
    async fn insert(&self, token: &PasswordResetToken) -> Result<(), PasswordResetRepositoryError> {
        let mut tables = self.tables().map_err(PasswordResetRepositoryError::query)?;
        if !tables.users.contains_key(token.user_id()) {
            return Err(PasswordResetRepositoryError::query(format!(
                "user {} does not exist",
                token.user_id()
            )));
        }
        tables
            .tokens
            .insert(token.token().as_str().to_owned(), token.clone());
        Ok(())
    }

    async fn find(
        &self,
        token: &ResetToken,
    ) -> Result<Option<PasswordResetToken>, PasswordResetRepositoryError> {
        let tables = self.tables().map_err(PasswordResetRepositoryError::query)?;
        Ok(tables.tokens.get(token.as_str()).cloned())
    }

    async fn redeem(
        &self,
        token: &ResetToken,
        now: DateTime<Utc>,
        password_hash: PasswordHash,
    ) -> Result<RedeemOutcome, PasswordResetRepositoryError> {
        let mut guard = self.tables().map_err(PasswordResetRepositoryError::query)?;
        let tables = &mut *guard;
        let Some(stored) = tables.tokens.get(token.as_str()) else {
            return Ok(RedeemOutcome::Missing);
        };
        if stored.is_expired_at(now) {
            return Ok(RedeemOutcome::Expired);
        }
        let user_id = *stored.user_id();
        let Some(row) = tables.users.get_mut(&user_id) else {
            tables.tokens.remove(token.as_str());
            return Ok(RedeemOutcome::Missing);
        };
        row.password_hash = password_hash;
        tables.tokens.remove(token.as_str());
        Ok(RedeemOutcome::Redeemed(user_id))
    }
}
