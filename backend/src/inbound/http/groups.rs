//! Group HTTP handlers.
//!
//! ```text
//! POST /api/v1/groups
//! GET /api/v1/groups?user=&text=&page=&limit=
//! GET /api/v1/groups/{id}
//! PATCH /api/v1/groups/{id}
//! DELETE /api/v1/groups/{id}
//! DELETE /api/v1/groups/{id}/players/{playerId}
//! ```
//!
//! An unfiltered listing answers `{ "groups": [...] }`; any `user` or `text`
//! filter answers `{ "groups": { "meta": ..., "data": [...] } }`.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::{PageRequest, Paginated, PaginationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateGroupRequest, GroupListing, GroupView, ListGroupsRequest, RemoveMemberRequest,
    UpdateGroupRequest,
};
use crate::domain::{
    Error, GroupDetails, GroupDetailsPatch, GroupFields, GroupId, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, map_group_validation_error, parse_optional_u32,
    parse_path_id, parse_required_id,
};

/// Group attributes as sent by clients.
///
/// Creation requires every attribute plus `master`; updates accept any
/// subset and ignore `master`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupBodyInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub location: Option<String>,
    pub chronic: Option<String>,
    #[schema(format = "uuid")]
    pub master: Option<String>,
}

impl GroupBodyInput {
    fn into_parts(self) -> (GroupFields, Option<String>) {
        let fields = GroupFields {
            name: self.name,
            description: self.description,
            schedule: self.schedule,
            location: self.location,
            chronic: self.chronic,
        };
        (fields, self.master)
    }
}

/// Master identity shown alongside a group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MasterUserBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
}

/// Member identity shown alongside a group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<User> for PlayerBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Group representation with its master and members.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub location: String,
    pub chronic: String,
    #[schema(format = "uuid")]
    pub master: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    pub master_user: Option<MasterUserBody>,
    pub players: Vec<PlayerBody>,
}

impl From<GroupView> for GroupBody {
    fn from(view: GroupView) -> Self {
        let GroupView {
            group,
            master,
            players,
        } = view;
        let details = group.details();
        Self {
            id: group.id().to_string(),
            name: details.name().to_owned(),
            description: details.description().to_owned(),
            schedule: details.schedule().to_owned(),
            location: details.location().to_owned(),
            chronic: details.chronic().to_owned(),
            master: group.master().to_string(),
            created_at: group.created_at().to_rfc3339(),
            master_user: master.map(|user| MasterUserBody {
                id: user.id().to_string(),
                username: user.username().to_string(),
            }),
            players: players.into_iter().map(PlayerBody::from).collect(),
        }
    }
}

/// `{ "group": ... }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupEnvelope {
    pub group: GroupBody,
}

impl From<GroupView> for GroupEnvelope {
    fn from(view: GroupView) -> Self {
        Self { group: view.into() }
    }
}

/// Either listing shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupsBody {
    All(Vec<GroupBody>),
    Page(Paginated<GroupBody>),
}

/// `{ "groups": ... }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupsEnvelope {
    /// A flat array when unfiltered, otherwise `{ meta, data }`.
    #[schema(value_type = Object)]
    pub groups: GroupsBody,
}

/// Query parameters for `GET /api/v1/groups`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListGroupsQuery {
    /// Only groups this user belongs to.
    pub user: Option<String>,
    /// Case-insensitive match on name or description.
    pub text: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
    /// Page size, at most 100.
    pub limit: Option<String>,
}

const MASTER: FieldName = FieldName::new("master");
const PAGE: FieldName = FieldName::new("page");
const LIMIT: FieldName = FieldName::new("limit");

fn map_pagination_error(err: PaginationError) -> Error {
    let field = match err {
        PaginationError::PageOutOfRange => PAGE,
        PaginationError::LimitOutOfRange { .. } => LIMIT,
    };
    invalid_value_error(field, err.to_string())
}

fn parse_list_query(query: ListGroupsQuery) -> Result<ListGroupsRequest, Error> {
    let page = parse_optional_u32(query.page, PAGE)?;
    let limit = parse_optional_u32(query.limit, LIMIT)?;
    let page = PageRequest::from_query(page, limit).map_err(map_pagination_error)?;
    Ok(ListGroupsRequest {
        user: query.user,
        text: query.text,
        page,
    })
}

fn parse_group_id(raw: &str) -> Result<GroupId, Error> {
    parse_path_id(raw, "group")
}

/// Found a group with the caller as master.
#[utoipa::path(
    post,
    path = "/api/v1/groups",
    request_body = GroupBodyInput,
    responses(
        (status = 201, description = "Group created", body = GroupEnvelope),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Master is not the caller", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "createGroup"
)]
#[post("/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GroupBodyInput>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let (fields, master) = payload.into_inner().into_parts();
    let master: UserId = parse_required_id(master, MASTER)?;
    let details = GroupDetails::try_from_fields(fields).map_err(map_group_validation_error)?;
    let view = state
        .groups
        .create_group(CreateGroupRequest {
            actor,
            master,
            details,
        })
        .await?;
    Ok(HttpResponse::Created().json(GroupEnvelope::from(view)))
}

/// List groups, flat when unfiltered and paginated otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    params(ListGroupsQuery),
    responses(
        (status = 200, description = "Groups", body = GroupsEnvelope),
        (status = 422, description = "Invalid paging parameters", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "listGroups",
    security([])
)]
#[get("/groups")]
pub async fn list_groups(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<ListGroupsQuery>,
) -> ApiResult<web::Json<GroupsEnvelope>> {
    let request = parse_list_query(query.into_inner())?;
    let groups = match state.groups_query.list_groups(request).await? {
        GroupListing::All(views) => {
            GroupsBody::All(views.into_iter().map(GroupBody::from).collect())
        }
        GroupListing::Page(page) => {
            GroupsBody::Page(page.map(GroupBody::from).with_links(&req.full_url()))
        }
    };
    Ok(web::Json(GroupsEnvelope { groups }))
}

/// Read one group.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    params(("id" = String, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Group", body = GroupEnvelope),
        (status = 404, description = "Unknown group", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "getGroup",
    security([])
)]
#[get("/groups/{id}")]
pub async fn get_group(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GroupEnvelope>> {
    let group_id = parse_group_id(&path)?;
    let view = state.groups_query.get_group(group_id).await?;
    Ok(web::Json(view.into()))
}

/// Replace the supplied attributes. Master only.
#[utoipa::path(
    patch,
    path = "/api/v1/groups/{id}",
    params(("id" = String, Path, description = "Group identifier")),
    request_body = GroupBodyInput,
    responses(
        (status = 200, description = "Group updated", body = GroupEnvelope),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the group master", body = ErrorSchema),
        (status = 404, description = "Unknown group", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "updateGroup"
)]
#[patch("/groups/{id}")]
pub async fn update_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<GroupBodyInput>,
) -> ApiResult<web::Json<GroupEnvelope>> {
    let actor = session.require_user_id()?;
    let group_id = parse_group_id(&path)?;
    let (fields, _master) = payload.into_inner().into_parts();
    let patch = GroupDetailsPatch::try_from_fields(fields).map_err(map_group_validation_error)?;
    let view = state
        .groups
        .update_group(UpdateGroupRequest {
            actor,
            group_id,
            patch,
        })
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete a group with its members and requests. Master only.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}",
    params(("id" = String, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Group deleted; empty object"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the group master", body = ErrorSchema),
        (status = 404, description = "Unknown group", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "deleteGroup"
)]
#[delete("/groups/{id}")]
pub async fn delete_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let group_id = parse_group_id(&path)?;
    state.groups.delete_group(actor, group_id).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Remove a member. The master cannot be removed.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}/players/{playerId}",
    params(
        ("id" = String, Path, description = "Group identifier"),
        ("playerId" = String, Path, description = "Member to remove")
    ),
    responses(
        (status = 200, description = "Member removed; empty object"),
        (status = 400, description = "The master cannot be removed", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Neither the master nor the member", body = ErrorSchema),
        (status = 404, description = "Unknown group or member", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "removePlayer"
)]
#[delete("/groups/{id}/players/{player_id}")]
pub async fn remove_player(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let (group_raw, player_raw) = path.into_inner();
    let group_id = parse_group_id(&group_raw)?;
    let user_id = parse_path_id(&player_raw, "player")?;
    state
        .groups
        .remove_member(RemoveMemberRequest {
            actor,
            group_id,
            user_id,
        })
        .await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

#[cfg(test)]
mod tests;
