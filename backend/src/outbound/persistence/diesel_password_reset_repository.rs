//! PostgreSQL-backed `PasswordResetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{PasswordResetRepository, PasswordResetRepositoryError, RedeemOutcome};
use crate::domain::{PasswordHash, PasswordResetToken, ResetToken, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::PasswordResetTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::{password_reset_tokens, users};

/// Diesel-backed implementation of the [`PasswordResetRepository`] port.
#[derive(Clone)]
pub struct DieselPasswordResetRepository {
    pool: DbPool,
}

impl DieselPasswordResetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PasswordResetRepositoryError {
    map_basic_pool_error(error, PasswordResetRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PasswordResetRepositoryError {
    map_basic_diesel_error(
        error,
        PasswordResetRepositoryError::query,
        PasswordResetRepositoryError::connection,
    )
}

fn row_to_token(
    row: PasswordResetTokenRow,
) -> Result<PasswordResetToken, PasswordResetRepositoryError> {
    let token = ResetToken::parse(&row.token)
        .ok_or_else(|| PasswordResetRepositoryError::query("stored reset token is blank"))?;
    Ok(PasswordResetToken::new(
        token,
        UserId::from_uuid(row.user_id),
        row.created_at,
    ))
}

#[async_trait]
impl PasswordResetRepository for DieselPasswordResetRepository {
    async fn insert(&self, token: &PasswordResetToken) -> Result<(), PasswordResetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = PasswordResetTokenRow {
            token: token.token().as_str().to_owned(),
            user_id: *token.user_id().as_uuid(),
            created_at: token.created_at(),
        };
        diesel::insert_into(password_reset_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(
        &self,
        token: &ResetToken,
    ) -> Result<Option<PasswordResetToken>, PasswordResetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = password_reset_tokens::table
            .filter(password_reset_tokens::token.eq(token.as_str()))
            .select(PasswordResetTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_token).transpose()
    }

    async fn redeem(
        &self,
        token: &ResetToken,
        now: DateTime<Utc>,
        password_hash: PasswordHash,
    ) -> Result<RedeemOutcome, PasswordResetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw = token.as_str().to_owned();
        let result: Result<Option<RedeemStep>, diesel::result::Error> = conn
            .transaction(|conn| {
                async move {
                    let row: Option<PasswordResetTokenRow> = password_reset_tokens::table
                        .filter(password_reset_tokens::token.eq(raw.as_str()))
                        .select(PasswordResetTokenRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let stored = PasswordResetToken::new(
                        token.clone(),
                        UserId::from_uuid(row.user_id),
                        row.created_at,
                    );
                    if stored.is_expired_at(now) {
                        return Ok(Some(RedeemStep::Expired));
                    }

                    diesel::update(users::table.filter(users::id.eq(row.user_id)))
                        .set(users::password_hash.eq(password_hash.as_str()))
                        .execute(conn)
                        .await?;
                    let consumed = password_reset_tokens::table
                        .filter(password_reset_tokens::token.eq(raw.as_str()));
                    diesel::delete(consumed).execute(conn).await?;
                    Ok(Some(RedeemStep::Redeemed(row.user_id)))
                }
                .scope_boxed()
            })
            .await;

        Ok(match result.map_err(map_diesel_error)? {
            None => RedeemOutcome::Missing,
            Some(RedeemStep::Expired) => RedeemOutcome::Expired,
            Some(RedeemStep::Redeemed(user)) => RedeemOutcome::Redeemed(UserId::from_uuid(user)),
        })
    }
}

enum RedeemStep {
    Expired,
    Redeemed(uuid::Uuid),
}
