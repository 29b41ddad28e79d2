//! [`GroupRepository`] over the in-memory tables.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    GroupFilter, GroupPage, GroupRepository, GroupRepositoryError, MembershipOutcome,
};
use crate::domain::{Group, GroupDetails, GroupId, MembershipChange};

use super::MemoryStore;

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create(&self, group: &Group) -> Result<(), GroupRepositoryError> {
        let mut tables = self.tables().map_err(GroupRepositoryError::query)?;
        if tables.groups.contains_key(group.id()) {
            return Err(GroupRepositoryError::query(format!(
                "group {} already exists",
                group.id()
            )));
        }
        tables.groups.insert(*group.id(), group.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let tables = self.tables().map_err(GroupRepositoryError::query)?;
        Ok(tables.groups.get(id).cloned())
    }

    async fn update_details(
        &self,
        id: &GroupId,
        details: &GroupDetails,
    ) -> Result<bool, GroupRepositoryError> {
        let mut tables = self.tables().map_err(GroupRepositoryError::query)?;
        let Some(group) = tables.groups.get_mut(id) else {
            return Ok(false);
        };
        *group = Group::new(
            *group.id(),
            details.clone(),
            group.membership().clone(),
            group.created_at(),
        );
        Ok(true)
    }

    async fn delete(&self, id: &GroupId) -> Result<bool, GroupRepositoryError> {
        let mut tables = self.tables().map_err(GroupRepositoryError::query)?;
        if tables.groups.remove(id).is_none() {
            return Ok(false);
        }
        tables.requests.retain(|_, request| !request.belongs_to(id));
        Ok(true)
    }

    async fn change_membership(
        &self,
        id: &GroupId,
        change: MembershipChange,
    ) -> Result<MembershipOutcome, GroupRepositoryError> {
        let mut tables = self.tables().map_err(GroupRepositoryError::query)?;
        let Some(group) = tables.groups.get_mut(id) else {
            return Ok(MembershipOutcome::GroupMissing);
        };
        Ok(match group.membership_mut().apply(change) {
            Ok(delta) => MembershipOutcome::Applied(delta),
            Err(refusal) => MembershipOutcome::Refused(refusal),
        })
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let tables = self.tables().map_err(GroupRepositoryError::query)?;
        Ok(tables
            .groups_in_order(|_| true)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_page(
        &self,
        filter: &GroupFilter,
        page: PageRequest,
    ) -> Result<GroupPage, GroupRepositoryError> {
        let tables = self.tables().map_err(GroupRepositoryError::query)?;
        let matching = tables.groups_in_order(|group| filter.matches(group));
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let groups = page.window(matching).into_iter().cloned().collect();
        Ok(GroupPage { groups, total })
    }
}
