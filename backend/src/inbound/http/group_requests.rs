//! Join request HTTP handlers, nested under their group.
//!
//! ```text
//! POST /api/v1/groups/{id}/requests
//! GET /api/v1/groups/{id}/requests?master={userId}
//! POST /api/v1/groups/{id}/requests/{requestId}/accept
//! DELETE /api/v1/groups/{id}/requests/{requestId}
//! ```
//!
//! The listing is scoped by `master` across all of that user's groups; the
//! group in the path only routes the call.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{GroupRequestAction, GroupRequestView};
use crate::domain::{Error, GroupId, GroupRequest, GroupRequestId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_path_id, parse_required_id};

/// Join request representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequestBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub group_id: String,
    /// `PENDING` or `ACCEPTED`.
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<GroupRequest> for GroupRequestBody {
    fn from(request: GroupRequest) -> Self {
        Self {
            id: request.id().to_string(),
            user_id: request.user_id().to_string(),
            group_id: request.group_id().to_string(),
            status: request.status().as_str().to_owned(),
            created_at: request.created_at().to_rfc3339(),
        }
    }
}

/// Group summary attached to listed requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestGroupBody {
    pub name: String,
    #[schema(format = "uuid")]
    pub master: String,
}

/// Requester summary attached to listed requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestUserBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
}

/// Pending request as shown in a master's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListedGroupRequestBody {
    #[serde(flatten)]
    pub request: GroupRequestBody,
    pub group: RequestGroupBody,
    pub user: Option<RequestUserBody>,
}

impl From<GroupRequestView> for ListedGroupRequestBody {
    fn from(view: GroupRequestView) -> Self {
        Self {
            request: view.request.into(),
            group: RequestGroupBody {
                name: view.group_name,
                master: view.group_master.to_string(),
            },
            user: view.requester.map(|user| RequestUserBody {
                id: user.id().to_string(),
                username: user.username().to_string(),
            }),
        }
    }
}

/// `{ "groupRequest": ... }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequestEnvelope {
    pub group_request: GroupRequestBody,
}

impl From<GroupRequest> for GroupRequestEnvelope {
    fn from(request: GroupRequest) -> Self {
        Self {
            group_request: request.into(),
        }
    }
}

/// `{ "groupRequests": [...] }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequestsEnvelope {
    pub group_requests: Vec<ListedGroupRequestBody>,
}

/// Query parameters for the master's inbox.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRequestsQuery {
    /// Required; the master whose pending requests are listed.
    pub master: Option<String>,
}

fn parse_action(
    actor: UserId,
    group_raw: &str,
    request_raw: &str,
) -> Result<GroupRequestAction, Error> {
    Ok(GroupRequestAction {
        actor,
        group_id: parse_path_id(group_raw, "group")?,
        request_id: parse_path_id::<GroupRequestId>(request_raw, "group request")?,
    })
}

/// Ask to join a group as the caller.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/requests",
    params(("id" = String, Path, description = "Group identifier")),
    responses(
        (status = 201, description = "Request created", body = GroupRequestEnvelope),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown group", body = ErrorSchema),
        (status = 409, description = "A pending request already exists", body = ErrorSchema),
        (status = 422, description = "Already a member", body = ErrorSchema)
    ),
    tags = ["group requests"],
    operation_id = "createGroupRequest"
)]
#[post("/groups/{id}/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let group_id: GroupId = parse_path_id(&path, "group")?;
    let request = state.group_requests.create_request(actor, group_id).await?;
    Ok(HttpResponse::Created().json(GroupRequestEnvelope::from(request)))
}

/// List pending requests across every group mastered by `master`.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/requests",
    params(("id" = String, Path, description = "Group identifier"), ListRequestsQuery),
    responses(
        (status = 200, description = "Pending requests", body = GroupRequestsEnvelope),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 422, description = "Missing or malformed master", body = ErrorSchema)
    ),
    tags = ["group requests"],
    operation_id = "listGroupRequests"
)]
#[get("/groups/{id}/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListRequestsQuery>,
) -> ApiResult<web::Json<GroupRequestsEnvelope>> {
    session.require_user_id()?;
    let master: UserId =
        parse_required_id(query.into_inner().master, FieldName::new("master"))?;
    let views = state.group_requests_query.list_requests(master).await?;
    Ok(web::Json(GroupRequestsEnvelope {
        group_requests: views.into_iter().map(Into::into).collect(),
    }))
}

/// Accept a request, admitting its requester. Master only.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/requests/{requestId}/accept",
    params(
        ("id" = String, Path, description = "Group identifier"),
        ("requestId" = String, Path, description = "Request identifier")
    ),
    responses(
        (status = 200, description = "Request accepted", body = GroupRequestEnvelope),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the group master", body = ErrorSchema),
        (status = 404, description = "Unknown group or request", body = ErrorSchema)
    ),
    tags = ["group requests"],
    operation_id = "acceptGroupRequest"
)]
#[post("/groups/{id}/requests/{request_id}/accept")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<GroupRequestEnvelope>> {
    let actor = session.require_user_id()?;
    let (group_raw, request_raw) = path.into_inner();
    let action = parse_action(actor, &group_raw, &request_raw)?;
    let request = state.group_requests.accept_request(action).await?;
    Ok(web::Json(request.into()))
}

/// Reject a request by deleting it. Master only.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}/requests/{requestId}",
    params(
        ("id" = String, Path, description = "Group identifier"),
        ("requestId" = String, Path, description = "Request identifier")
    ),
    responses(
        (status = 200, description = "Request deleted; empty object"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the group master", body = ErrorSchema),
        (status = 404, description = "Unknown group or request", body = ErrorSchema)
    ),
    tags = ["group requests"],
    operation_id = "rejectGroupRequest"
)]
#[delete("/groups/{id}/requests/{request_id}")]
pub async fn reject_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let (group_raw, request_raw) = path.into_inner();
    let action = parse_action(actor, &group_raw, &request_raw)?;
    state.group_requests.reject_request(action).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}
