//! [`GroupRequestRepository`] over the in-memory tables.

use async_trait::async_trait;

use crate::domain::ports::{
    AcceptOutcome, CreatePendingOutcome, GroupRequestRepository, GroupRequestRepositoryError,
    PendingRequestRecord,
};
use crate::domain::{GroupId, GroupRequest, GroupRequestId, MembershipChange, UserId};

use super::MemoryStore;

#[async_trait]
impl GroupRequestRepository for MemoryStore {
    async fn create_pending(
        &self,
        request: &GroupRequest,
    ) -> Result<CreatePendingOutcome, GroupRequestRepositoryError> {
        let mut tables = self.tables().map_err(GroupRequestRepositoryError::query)?;
        let Some(group) = tables.groups.get(request.group_id()) else {
            return Ok(CreatePendingOutcome::GroupMissing);
        };
        let already_member = group.membership().contains(request.user_id());
        let duplicate = tables.requests.values().any(|existing| {
            existing.is_pending()
                && existing.belongs_to(request.group_id())
                && existing.user_id() == request.user_id()
        });
        if duplicate {
            return Ok(CreatePendingOutcome::DuplicatePending);
        }
        if already_member {
            return Ok(CreatePendingOutcome::AlreadyMember);
        }
        tables.requests.insert(*request.id(), request.clone());
        Ok(CreatePendingOutcome::Created)
    }

    async fn find_by_id(
        &self,
        id: &GroupRequestId,
    ) -> Result<Option<GroupRequest>, GroupRequestRepositoryError> {
        let tables = self.tables().map_err(GroupRequestRepositoryError::query)?;
        Ok(tables.requests.get(id).cloned())
    }

    async fn accept(
        &self,
        group_id: &GroupId,
        id: &GroupRequestId,
    ) -> Result<AcceptOutcome, GroupRequestRepositoryError> {
        let mut guard = self.tables().map_err(GroupRequestRepositoryError::query)?;
        let tables = &mut *guard;
        let Some(request) = tables
            .requests
            .get_mut(id)
            .filter(|request| request.belongs_to(group_id))
        else {
            return Ok(AcceptOutcome::NotFound);
        };
        let Some(group) = tables.groups.get_mut(group_id) else {
            return Ok(AcceptOutcome::NotFound);
        };
        // Re-accepting after the player left enrols them again.
        group
            .membership_mut()
            .apply(MembershipChange::Admit(*request.user_id()))
            .map_err(|refusal| GroupRequestRepositoryError::query(refusal.to_string()))?;
        if request.is_pending() {
            *request = request.clone().accept();
        }
        Ok(AcceptOutcome::Accepted(request.clone()))
    }

    async fn delete(
        &self,
        group_id: &GroupId,
        id: &GroupRequestId,
    ) -> Result<bool, GroupRequestRepositoryError> {
        let mut tables = self.tables().map_err(GroupRequestRepositoryError::query)?;
        let belongs = tables
            .requests
            .get(id)
            .is_some_and(|request| request.belongs_to(group_id));
        if belongs {
            tables.requests.remove(id);
        }
        Ok(belongs)
    }

    async fn list_pending_for_master(
        &self,
        master: &UserId,
    ) -> Result<Vec<PendingRequestRecord>, GroupRequestRepositoryError> {
        let tables = self.tables().map_err(GroupRequestRepositoryError::query)?;
        let mut records: Vec<PendingRequestRecord> = tables
            .requests
            .values()
            .filter(|request| request.is_pending())
            .filter_map(|request| {
                let group = tables.groups.get(request.group_id())?;
                (group.master() == master).then(|| PendingRequestRecord {
                    request: request.clone(),
                    group_name: group.details().name().to_owned(),
                    group_master: *group.master(),
                })
            })
            .collect();
        records.sort_by_key(|record| (record.request.created_at(), *record.request.id()));
        Ok(records)
    }
}
