//! Group domain services.
//!
//! [`GroupService`] implements the group command and query driving ports:
//! it authorises callers against the group master, delegates atomic state
//! changes to the [`GroupRepository`], and enriches groups with member
//! identities resolved through the [`UserRepository`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Paginated;
use tracing::info;

use crate::domain::ports::{
    CreateGroupRequest, GroupCommand, GroupFilter, GroupListing, GroupQuery, GroupRepository,
    GroupView, ListGroupsRequest, MembershipOutcome, RemoveMemberRequest, UpdateGroupRequest,
    UserRepository,
};
use crate::domain::user_account_service::map_user_repository_error;
use crate::domain::{Error, Group, GroupId, MembershipChange, MembershipError, User, UserId};

fn group_not_found(id: &GroupId) -> Error {
    Error::not_found(format!("group {id} not found"))
}

/// Group service implementing [`GroupCommand`] and [`GroupQuery`].
#[derive(Clone)]
pub struct GroupService<G, U> {
    groups: Arc<G>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<G, U> GroupService<G, U> {
    /// Create a new service over the group and user repositories.
    pub fn new(groups: Arc<G>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            groups,
            users,
            clock,
        }
    }
}

impl<G, U> GroupService<G, U>
where
    G: GroupRepository,
    U: UserRepository,
{
    async fn load(&self, id: &GroupId) -> Result<Group, Error> {
        self.groups
            .find_by_id(id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| group_not_found(id))
    }

    async fn load_mastered(
        &self,
        id: &GroupId,
        actor: &UserId,
        action: &str,
    ) -> Result<Group, Error> {
        let group = self.load(id).await?;
        if group.master() != actor {
            return Err(Error::forbidden(format!(
                "only the group master can {action} the group"
            )));
        }
        Ok(group)
    }

    async fn enrich(&self, groups: Vec<Group>) -> Result<Vec<GroupView>, Error> {
        let mut ids: Vec<UserId> = groups
            .iter()
            .flat_map(|group| group.membership().members().iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<UserId, User> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_by_ids(&ids)
                .await
                .map_err(map_user_repository_error)?
                .into_iter()
                .map(|user| (*user.id(), user))
                .collect()
        };

        Ok(groups
            .into_iter()
            .map(|group| {
                let players = group
                    .membership()
                    .members()
                    .iter()
                    .filter_map(|id| users.get(id).cloned())
                    .collect();
                GroupView {
                    master: users.get(group.master()).cloned(),
                    players,
                    group,
                }
            })
            .collect())
    }

    async fn enrich_one(&self, group: Group) -> Result<GroupView, Error> {
        self.enrich(vec![group])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("group enrichment dropped the group"))
    }
}

#[async_trait]
impl<G, U> GroupCommand for GroupService<G, U>
where
    G: GroupRepository,
    U: UserRepository,
{
    async fn create_group(&self, request: CreateGroupRequest) -> Result<GroupView, Error> {
        let CreateGroupRequest {
            actor,
            master,
            details,
        } = request;

        let master_exists = self
            .users
            .find_by_id(&master)
            .await
            .map_err(map_user_repository_error)?
            .is_some();
        if !master_exists {
            return Err(Error::invalid_request("master must reference an existing user")
                .with_details(serde_json::json!({ "field": "master", "code": "unknown_user" })));
        }
        if master != actor {
            return Err(Error::forbidden("groups can only be created for yourself"));
        }

        let group = Group::found(GroupId::random(), details, master, self.clock.utc());
        self.groups
            .create(&group)
            .await
            .map_err(Error::from)?;
        info!(group_id = %group.id(), master = %master, "group created");

        self.enrich_one(group).await
    }

    async fn update_group(&self, request: UpdateGroupRequest) -> Result<GroupView, Error> {
        let UpdateGroupRequest {
            actor,
            group_id,
            patch,
        } = request;
        let group = self.load_mastered(&group_id, &actor, "update").await?;
        if patch.is_empty() {
            return self.enrich_one(group).await;
        }

        let updated = group.with_details_patch(patch);
        let found = self
            .groups
            .update_details(&group_id, updated.details())
            .await
            .map_err(Error::from)?;
        if !found {
            return Err(group_not_found(&group_id));
        }

        self.enrich_one(updated).await
    }

    async fn delete_group(&self, actor: UserId, group_id: GroupId) -> Result<(), Error> {
        self.load_mastered(&group_id, &actor, "delete").await?;
        let deleted = self
            .groups
            .delete(&group_id)
            .await
            .map_err(Error::from)?;
        if !deleted {
            return Err(group_not_found(&group_id));
        }
        info!(group_id = %group_id, "group deleted");
        Ok(())
    }

    async fn remove_member(&self, request: RemoveMemberRequest) -> Result<(), Error> {
        let RemoveMemberRequest {
            actor,
            group_id,
            user_id,
        } = request;
        let group = self.load(&group_id).await?;
        if actor != *group.master() && actor != user_id {
            return Err(Error::forbidden(
                "only the group master or the member can remove a member",
            ));
        }

        let outcome = self
            .groups
            .change_membership(&group_id, MembershipChange::Remove(user_id))
            .await
            .map_err(Error::from)?;
        match outcome {
            MembershipOutcome::Applied(_) => Ok(()),
            MembershipOutcome::GroupMissing => Err(group_not_found(&group_id)),
            MembershipOutcome::Refused(MembershipError::MasterRemoval) => Err(
                Error::invalid_operation("the group master cannot be removed from the group"),
            ),
            MembershipOutcome::Refused(MembershipError::NotAMember) => Err(Error::not_found(
                format!("user {user_id} is not a member of group {group_id}"),
            )),
            MembershipOutcome::Refused(MembershipError::MasterMissing) => {
                Err(Error::internal("stored group membership is inconsistent"))
            }
        }
    }
}

#[async_trait]
impl<G, U> GroupQuery for GroupService<G, U>
where
    G: GroupRepository,
    U: UserRepository,
{
    async fn get_group(&self, group_id: GroupId) -> Result<GroupView, Error> {
        let group = self.load(&group_id).await?;
        self.enrich_one(group).await
    }

    async fn list_groups(&self, request: ListGroupsRequest) -> Result<GroupListing, Error> {
        let ListGroupsRequest { user, text, page } = request;
        let user = user.filter(|raw| !raw.trim().is_empty());
        let text = text
            .map(|raw| raw.trim().to_lowercase())
            .filter(|needle| !needle.is_empty());

        if user.is_none() && text.is_none() {
            let groups = self
                .groups
                .list_all()
                .await
                .map_err(Error::from)?;
            return Ok(GroupListing::All(self.enrich(groups).await?));
        }

        let member = match user.as_deref().map(|raw| raw.trim().parse::<UserId>()) {
            None => None,
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => return Ok(GroupListing::Page(Paginated::new(page, 0, Vec::new()))),
        };
        let filter = GroupFilter { member, text };
        let found = self
            .groups
            .list_page(&filter, page)
            .await
            .map_err(Error::from)?;
        let views = self.enrich(found.groups).await?;
        Ok(GroupListing::Page(Paginated::new(page, found.total, views)))
    }
}

#[cfg(test)]
#[path = "group_service_tests.rs"]
mod tests;
