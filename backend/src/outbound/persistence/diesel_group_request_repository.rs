//! PostgreSQL-backed `GroupRequestRepository` implementation using Diesel ORM.
//!
//! Request creation holds a share lock on the group row while it checks for
//! duplicates and membership; the partial unique index on pending requests
//! catches any race the lock does not. Acceptance locks the group row so the
//! status change and the membership insert commit together.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    AcceptOutcome, CreatePendingOutcome, GroupRequestRepository, GroupRequestRepositoryError,
    PendingRequestRecord,
};
use crate::domain::{
    GroupId, GroupRequest, GroupRequestId, GroupRequestStatus, MembershipChange, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_group_repository::{LockedMembership, lock_membership, persist_delta};
use super::models::GroupRequestRow;
use super::pool::{DbPool, PoolError};
use super::schema::{group_members, group_requests, groups};

const PENDING: &str = GroupRequestStatus::Pending.as_str();

/// Diesel-backed implementation of the [`GroupRequestRepository`] port.
#[derive(Clone)]
pub struct DieselGroupRequestRepository {
    pool: DbPool,
}

impl DieselGroupRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRequestRepositoryError {
    map_basic_pool_error(error, GroupRequestRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> GroupRequestRepositoryError {
    map_basic_diesel_error(
        error,
        GroupRequestRepositoryError::query,
        GroupRequestRepositoryError::connection,
    )
}

fn row_to_request(row: GroupRequestRow) -> Result<GroupRequest, GroupRequestRepositoryError> {
    let status = row
        .status
        .parse::<GroupRequestStatus>()
        .map_err(|err| GroupRequestRepositoryError::query(err.to_string()))?;
    Ok(GroupRequest::new(
        GroupRequestId::from_uuid(row.id),
        GroupId::from_uuid(row.group_id),
        UserId::from_uuid(row.user_id),
        status,
        row.created_at,
    ))
}

fn request_to_row(request: &GroupRequest) -> GroupRequestRow {
    GroupRequestRow {
        id: *request.id().as_uuid(),
        group_id: *request.group_id().as_uuid(),
        user_id: *request.user_id().as_uuid(),
        status: request.status().as_str().to_owned(),
        created_at: request.created_at(),
    }
}

/// Transaction failure that still carries a domain answer.
enum AcceptFailure {
    Database(DieselError),
    Refused(String),
}

impl From<DieselError> for AcceptFailure {
    fn from(error: DieselError) -> Self {
        Self::Database(error)
    }
}

#[async_trait]
impl GroupRequestRepository for DieselGroupRequestRepository {
    async fn create_pending(
        &self,
        request: &GroupRequest,
    ) -> Result<CreatePendingOutcome, GroupRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = request_to_row(request);
        let result: Result<CreatePendingOutcome, DieselError> = conn
            .transaction(|conn| {
                async move {
                    let group: Option<Uuid> = groups::table
                        .filter(groups::id.eq(row.group_id))
                        .select(groups::id)
                        .for_share()
                        .first(conn)
                        .await
                        .optional()?;
                    if group.is_none() {
                        return Ok(CreatePendingOutcome::GroupMissing);
                    }

                    let pending: i64 = group_requests::table
                        .filter(group_requests::group_id.eq(row.group_id))
                        .filter(group_requests::user_id.eq(row.user_id))
                        .filter(group_requests::status.eq(PENDING))
                        .count()
                        .get_result(conn)
                        .await?;
                    if pending > 0 {
                        return Ok(CreatePendingOutcome::DuplicatePending);
                    }

                    let member: i64 = group_members::table
                        .filter(group_members::group_id.eq(row.group_id))
                        .filter(group_members::user_id.eq(row.user_id))
                        .count()
                        .get_result(conn)
                        .await?;
                    if member > 0 {
                        return Ok(CreatePendingOutcome::AlreadyMember);
                    }

                    diesel::insert_into(group_requests::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(CreatePendingOutcome::Created)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Ok(CreatePendingOutcome::DuplicatePending)
            }
            Err(error) => Err(map_diesel_error(error)),
        }
    }

    async fn find_by_id(
        &self,
        id: &GroupRequestId,
    ) -> Result<Option<GroupRequest>, GroupRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = group_requests::table
            .filter(group_requests::id.eq(id.as_uuid()))
            .select(GroupRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn accept(
        &self,
        group_id: &GroupId,
        id: &GroupRequestId,
    ) -> Result<AcceptOutcome, GroupRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let group_uuid = *group_id.as_uuid();
        let request_uuid = *id.as_uuid();
        let result: Result<Option<GroupRequestRow>, AcceptFailure> = conn
            .transaction(|conn| {
                async move {
                    let mut membership = match lock_membership(conn, group_uuid).await? {
                        LockedMembership::Missing => return Ok(None),
                        LockedMembership::Corrupt => {
                            return Err(AcceptFailure::Refused(format!(
                                "stored group {group_uuid} has no master membership"
                            )));
                        }
                        LockedMembership::Found(membership) => membership,
                    };
                    let row: Option<GroupRequestRow> = group_requests::table
                        .filter(group_requests::id.eq(request_uuid))
                        .filter(group_requests::group_id.eq(group_uuid))
                        .select(GroupRequestRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(mut row) = row else {
                        return Ok(None);
                    };

                    // Re-accepting after the player left enrols them again.
                    let delta = membership
                        .apply(MembershipChange::Admit(UserId::from_uuid(row.user_id)))
                        .map_err(|refusal| AcceptFailure::Refused(refusal.to_string()))?;
                    persist_delta(conn, group_uuid, delta).await?;
                    if row.status != PENDING {
                        return Ok(Some(row));
                    }

                    let accepted = GroupRequestStatus::Accepted.as_str();
                    let target = group_requests::table.filter(group_requests::id.eq(request_uuid));
                    diesel::update(target)
                        .set(group_requests::status.eq(accepted))
                        .execute(conn)
                        .await?;
                    accepted.clone_into(&mut row.status);
                    Ok(Some(row))
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(Some(row)) => Ok(AcceptOutcome::Accepted(row_to_request(row)?)),
            Ok(None) => Ok(AcceptOutcome::NotFound),
            Err(AcceptFailure::Database(error)) => Err(map_diesel_error(error)),
            Err(AcceptFailure::Refused(message)) => {
                Err(GroupRequestRepositoryError::query(message))
            }
        }
    }

    async fn delete(
        &self,
        group_id: &GroupId,
        id: &GroupRequestId,
    ) -> Result<bool, GroupRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            group_requests::table
                .filter(group_requests::id.eq(id.as_uuid()))
                .filter(group_requests::group_id.eq(group_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_pending_for_master(
        &self,
        master: &UserId,
    ) -> Result<Vec<PendingRequestRecord>, GroupRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(GroupRequestRow, String, Uuid)> = group_requests::table
            .inner_join(groups::table)
            .filter(groups::master.eq(master.as_uuid()))
            .filter(group_requests::status.eq(PENDING))
            .order_by((group_requests::created_at, group_requests::id))
            .select((GroupRequestRow::as_select(), groups::name, groups::master))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, group_name, group_master)| {
                Ok(PendingRequestRecord {
                    request: row_to_request(row)?,
                    group_name,
                    group_master: UserId::from_uuid(group_master),
                })
            })
            .collect()
    }
}
