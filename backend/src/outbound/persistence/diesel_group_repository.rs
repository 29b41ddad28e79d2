//! PostgreSQL-backed `GroupRepository` implementation using Diesel ORM.
//!
//! Membership changes lock the group row, rebuild the domain [`Membership`]
//! from the stored rows and persist whatever delta [`Membership::apply`]
//! reports, so the master invariant is enforced by the domain rather than by
//! ad hoc SQL. Reads run in one read-only repeatable-read transaction, so a
//! group row and its member rows always come from the same snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    GroupFilter, GroupPage, GroupRepository, GroupRepositoryError, MembershipOutcome,
};
use crate::domain::{
    Group, GroupDetails, GroupFields, GroupId, Membership, MembershipChange, MembershipDelta,
    MembershipError, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GroupDetailsUpdate, GroupRow, NewGroupRow, NewMemberRow};
use super::pool::{DbPool, PoolError};
use super::schema::{group_members, groups};

/// Diesel-backed implementation of the [`GroupRepository`] port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRepositoryError {
    map_basic_pool_error(error, GroupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GroupRepositoryError {
    map_basic_diesel_error(
        error,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
    )
}

/// Result of reading a membership set inside a transaction.
pub(super) enum LockedMembership {
    Missing,
    Corrupt,
    Found(Membership),
}

/// Lock the group row and rebuild its membership set.
pub(super) async fn lock_membership(
    conn: &mut AsyncPgConnection,
    group_id: Uuid,
) -> QueryResult<LockedMembership> {
    let master: Option<Uuid> = groups::table
        .filter(groups::id.eq(group_id))
        .select(groups::master)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(master) = master else {
        return Ok(LockedMembership::Missing);
    };
    let members: Vec<Uuid> = group_members::table
        .filter(group_members::group_id.eq(group_id))
        .order_by(group_members::position)
        .select(group_members::user_id)
        .load(conn)
        .await?;
    let members = members.into_iter().map(UserId::from_uuid).collect();
    Ok(
        match Membership::restore(UserId::from_uuid(master), members) {
            Ok(membership) => LockedMembership::Found(membership),
            Err(_) => LockedMembership::Corrupt,
        },
    )
}

/// Persist the row-level effect of an applied membership change.
pub(super) async fn persist_delta(
    conn: &mut AsyncPgConnection,
    group_id: Uuid,
    delta: MembershipDelta,
) -> QueryResult<()> {
    match delta {
        MembershipDelta::Admitted(user) => {
            diesel::insert_into(group_members::table)
                .values(NewMemberRow {
                    group_id,
                    user_id: *user.as_uuid(),
                })
                .execute(conn)
                .await?;
        }
        MembershipDelta::Removed(user) => {
            diesel::delete(
                group_members::table
                    .filter(group_members::group_id.eq(group_id))
                    .filter(group_members::user_id.eq(user.as_uuid())),
            )
            .execute(conn)
            .await?;
        }
        MembershipDelta::Unchanged(_) => {}
    }
    Ok(())
}

fn row_to_group(row: GroupRow, members: Vec<UserId>) -> Result<Group, GroupRepositoryError> {
    let details = GroupDetails::try_from_fields(GroupFields {
        name: Some(row.name),
        description: Some(row.description),
        schedule: Some(row.schedule),
        location: Some(row.location),
        chronic: Some(row.chronic),
    })
    .map_err(|err| GroupRepositoryError::query(format!("stored group {}: {err}", row.id)))?;
    let membership = Membership::restore(UserId::from_uuid(row.master), members)
        .map_err(|err| GroupRepositoryError::query(format!("stored group {}: {err}", row.id)))?;
    Ok(Group::new(
        GroupId::from_uuid(row.id),
        details,
        membership,
        row.created_at,
    ))
}

async fn load_members(
    conn: &mut AsyncPgConnection,
    group_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, Vec<UserId>>> {
    let rows: Vec<(Uuid, Uuid)> = group_members::table
        .filter(group_members::group_id.eq_any(group_ids))
        .order_by(group_members::position)
        .select((group_members::group_id, group_members::user_id))
        .load(conn)
        .await?;
    let mut members: HashMap<Uuid, Vec<UserId>> = HashMap::new();
    for (group_id, user_id) in rows {
        members
            .entry(group_id)
            .or_default()
            .push(UserId::from_uuid(user_id));
    }
    Ok(members)
}

type GroupRowsWithMembers = (Vec<GroupRow>, HashMap<Uuid, Vec<UserId>>);

async fn with_members(
    conn: &mut AsyncPgConnection,
    rows: Vec<GroupRow>,
) -> QueryResult<GroupRowsWithMembers> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let members = load_members(conn, &ids).await?;
    Ok((rows, members))
}

fn assemble(
    (rows, mut members): GroupRowsWithMembers,
) -> Result<Vec<Group>, GroupRepositoryError> {
    rows.into_iter()
        .map(|row| {
            let enrolled = members.remove(&row.id).unwrap_or_default();
            row_to_group(row, enrolled)
        })
        .collect()
}

/// Escape `LIKE` metacharacters so user text matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn filtered(filter: &GroupFilter) -> groups::BoxedQuery<'static, Pg> {
    let mut query = groups::table.into_boxed();
    if let Some(member) = filter.member {
        query = query.filter(
            groups::id.eq_any(
                group_members::table
                    .filter(group_members::user_id.eq(*member.as_uuid()))
                    .select(group_members::group_id),
            ),
        );
    }
    if let Some(text) = filter.text.as_deref() {
        let pattern = like_pattern(text);
        query = query.filter(
            groups::name
                .ilike(pattern.clone())
                .or(groups::description.ilike(pattern)),
        );
    }
    query
}

fn to_db_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn create(&self, group: &Group) -> Result<(), GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = group.details();
        let row = NewGroupRow {
            id: *group.id().as_uuid(),
            name: details.name(),
            description: details.description(),
            schedule: details.schedule(),
            location: details.location(),
            chronic: details.chronic(),
            master: *group.master().as_uuid(),
            created_at: group.created_at(),
        };
        let members: Vec<NewMemberRow> = group
            .membership()
            .members()
            .iter()
            .map(|user| NewMemberRow {
                group_id: row.id,
                user_id: *user.as_uuid(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(groups::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                for member in members {
                    diesel::insert_into(group_members::table)
                        .values(member)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let group_id = *id.as_uuid();
        let snapshot = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let rows: Vec<GroupRow> = groups::table
                        .filter(groups::id.eq(group_id))
                        .select(GroupRow::as_select())
                        .load(conn)
                        .await?;
                    with_members(conn, rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(assemble(snapshot)?.pop())
    }

    async fn update_details(
        &self,
        id: &GroupId,
        details: &GroupDetails,
    ) -> Result<bool, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = GroupDetailsUpdate {
            name: details.name(),
            description: details.description(),
            schedule: details.schedule(),
            location: details.location(),
            chronic: details.chronic(),
        };
        let updated = diesel::update(groups::table.filter(groups::id.eq(id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &GroupId) -> Result<bool, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Members and requests go with the group through ON DELETE CASCADE.
        let deleted = diesel::delete(groups::table.filter(groups::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn change_membership(
        &self,
        id: &GroupId,
        change: MembershipChange,
    ) -> Result<MembershipOutcome, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let group_id = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let mut membership = match lock_membership(conn, group_id).await? {
                    LockedMembership::Missing => return Ok(MembershipOutcome::GroupMissing),
                    LockedMembership::Corrupt => {
                        return Ok(MembershipOutcome::Refused(MembershipError::MasterMissing));
                    }
                    LockedMembership::Found(membership) => membership,
                };
                match membership.apply(change) {
                    Ok(delta) => {
                        persist_delta(conn, group_id, delta).await?;
                        Ok(MembershipOutcome::Applied(delta))
                    }
                    Err(refusal) => Ok(MembershipOutcome::Refused(refusal)),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let snapshot = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let rows: Vec<GroupRow> = groups::table
                        .order_by((groups::created_at, groups::id))
                        .select(GroupRow::as_select())
                        .load(conn)
                        .await?;
                    with_members(conn, rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        assemble(snapshot)
    }

    async fn list_page(
        &self,
        filter: &GroupFilter,
        page: PageRequest,
    ) -> Result<GroupPage, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let limit = i64::from(page.limit());
        let offset = to_db_count(page.offset());
        let (total, snapshot) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let total: i64 = filtered(filter).count().get_result(conn).await?;
                    let rows: Vec<GroupRow> = filtered(filter)
                        .order_by((groups::created_at, groups::id))
                        .limit(limit)
                        .offset(offset)
                        .select(GroupRow::as_select())
                        .load(conn)
                        .await?;
                    let snapshot = with_members(conn, rows).await?;
                    Ok::<_, diesel::result::Error>((total, snapshot))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(GroupPage {
            groups: assemble(snapshot)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
