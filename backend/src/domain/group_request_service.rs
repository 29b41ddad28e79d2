//! Join request domain services.
//!
//! The service authorises callers against the group master and leaves the
//! duplicate, membership and accept-then-admit checks to the repository,
//! which performs each of them as one atomic unit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AcceptOutcome, CreatePendingOutcome, GroupRepository, GroupRequestAction, GroupRequestCommand,
    GroupRequestQuery, GroupRequestRepository, GroupRequestView, UserRepository,
};
use crate::domain::user_account_service::map_user_repository_error;
use crate::domain::{Error, Group, GroupId, GroupRequest, GroupRequestId, User, UserId};

fn request_not_found(id: &GroupRequestId) -> Error {
    Error::not_found(format!("group request {id} not found"))
}

/// Join request service implementing [`GroupRequestCommand`] and
/// [`GroupRequestQuery`].
#[derive(Clone)]
pub struct GroupRequestService<R, G, U> {
    requests: Arc<R>,
    groups: Arc<G>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, G, U> GroupRequestService<R, G, U> {
    /// Create a new service over the request, group and user repositories.
    pub fn new(requests: Arc<R>, groups: Arc<G>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests,
            groups,
            users,
            clock,
        }
    }
}

impl<R, G, U> GroupRequestService<R, G, U>
where
    G: GroupRepository,
{
    async fn load_mastered(&self, group_id: &GroupId, actor: &UserId) -> Result<Group, Error> {
        let group = self
            .groups
            .find_by_id(group_id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| Error::not_found(format!("group {group_id} not found")))?;
        if group.master() != actor {
            return Err(Error::forbidden(
                "only the group master can decide on join requests",
            ));
        }
        Ok(group)
    }
}

#[async_trait]
impl<R, G, U> GroupRequestCommand for GroupRequestService<R, G, U>
where
    R: GroupRequestRepository,
    G: GroupRepository,
    U: UserRepository,
{
    async fn create_request(
        &self,
        actor: UserId,
        group_id: GroupId,
    ) -> Result<GroupRequest, Error> {
        let request = GroupRequest::pending(group_id, actor, self.clock.utc());
        let outcome = self
            .requests
            .create_pending(&request)
            .await
            .map_err(Error::from)?;
        match outcome {
            CreatePendingOutcome::Created => {
                info!(request_id = %request.id(), group_id = %group_id, "join request opened");
                Ok(request)
            }
            CreatePendingOutcome::GroupMissing => {
                Err(Error::not_found(format!("group {group_id} not found")))
            }
            CreatePendingOutcome::DuplicatePending => Err(Error::conflict(
                "a pending request for this group already exists",
            )),
            CreatePendingOutcome::AlreadyMember => Err(Error::invalid_request(
                "user is already a member of the group",
            )),
        }
    }

    async fn accept_request(&self, action: GroupRequestAction) -> Result<GroupRequest, Error> {
        let GroupRequestAction {
            actor,
            group_id,
            request_id,
        } = action;
        self.load_mastered(&group_id, &actor).await?;
        let outcome = self
            .requests
            .accept(&group_id, &request_id)
            .await
            .map_err(Error::from)?;
        match outcome {
            AcceptOutcome::Accepted(request) => {
                info!(request_id = %request_id, group_id = %group_id, "join request accepted");
                Ok(request)
            }
            AcceptOutcome::NotFound => Err(request_not_found(&request_id)),
        }
    }

    async fn reject_request(&self, action: GroupRequestAction) -> Result<(), Error> {
        let GroupRequestAction {
            actor,
            group_id,
            request_id,
        } = action;
        self.load_mastered(&group_id, &actor).await?;
        let deleted = self
            .requests
            .delete(&group_id, &request_id)
            .await
            .map_err(Error::from)?;
        if !deleted {
            return Err(request_not_found(&request_id));
        }
        info!(request_id = %request_id, group_id = %group_id, "join request rejected");
        Ok(())
    }
}

#[async_trait]
impl<R, G, U> GroupRequestQuery for GroupRequestService<R, G, U>
where
    R: GroupRequestRepository,
    G: GroupRepository,
    U: UserRepository,
{
    async fn list_requests(&self, master: UserId) -> Result<Vec<GroupRequestView>, Error> {
        let records = self
            .requests
            .list_pending_for_master(&master)
            .await
            .map_err(Error::from)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<UserId> = records
            .iter()
            .map(|record| *record.request.user_id())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let users: HashMap<UserId, User> = self
            .users
            .find_by_ids(&ids)
            .await
            .map_err(map_user_repository_error)?
            .into_iter()
            .map(|user| (*user.id(), user))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| GroupRequestView {
                requester: users.get(record.request.user_id()).cloned(),
                request: record.request,
                group_name: record.group_name,
                group_master: record.group_master,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "group_request_service_tests.rs"]
mod tests;
