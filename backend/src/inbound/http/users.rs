//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"username":"ada","email":"ada@example.com","password":"secret"}
//! PUT /api/v1/users/{id} {"avatar":"https://images.example.com/ada.png"}
//! ```

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RegisterUserRequest, UpdateUserRequest};
use crate::domain::{AvatarUrl, EmailAddress, Error, Password, User, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_password_validation_error, map_user_validation_error, parse_path_id, require,
};

/// Registration payload for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

/// Profile update payload for `PUT /api/v1/users/{id}`; absent fields stay.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

/// Account representation returned to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            avatar: user.avatar().map(|avatar| avatar.as_ref().to_owned()),
        }
    }
}

/// `{ "user": ... }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserBody,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

const USERNAME: FieldName = FieldName::new("username");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const AVATAR: FieldName = FieldName::new("avatar");

fn parse_email(raw: String) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| map_user_validation_error(EMAIL, err))
}

fn parse_password(raw: &str) -> Result<Password, Error> {
    Password::new(raw).map_err(|err| map_password_validation_error(PASSWORD, err))
}

/// Blank avatars count as absent.
fn parse_avatar(raw: Option<String>) -> Result<Option<AvatarUrl>, Error> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| AvatarUrl::new(value).map_err(|err| map_user_validation_error(AVATAR, err)))
        .transpose()
}

fn parse_registration(body: RegisterUserBody) -> Result<RegisterUserRequest, Error> {
    let username = Username::new(require(body.username, USERNAME)?)
        .map_err(|err| map_user_validation_error(USERNAME, err))?;
    let email = parse_email(require(body.email, EMAIL)?)?;
    let password = parse_password(&require(body.password, PASSWORD)?)?;
    let avatar = parse_avatar(body.avatar)?;
    Ok(RegisterUserRequest {
        username,
        email,
        password,
        avatar,
    })
}

fn parse_update(
    body: UpdateUserBody,
    actor: UserId,
    user_id: UserId,
) -> Result<UpdateUserRequest, Error> {
    Ok(UpdateUserRequest {
        actor,
        user_id,
        email: body.email.map(parse_email).transpose()?,
        password: body.password.as_deref().map(parse_password).transpose()?,
        avatar: parse_avatar(body.avatar)?,
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "Account created", body = UserEnvelope),
        (status = 409, description = "Email or username already in use", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_registration(payload.into_inner())?;
    let user = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(UserEnvelope::from(user)))
}

/// Update the caller's own account.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Account updated", body = UserEnvelope),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not the account owner", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Email already in use", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let actor = session.require_user_id()?;
    let user_id = parse_path_id(&path, "user")?;
    let request = parse_update(payload.into_inner(), actor, user_id)?;
    let user = state.accounts.update_user(request).await?;
    Ok(web::Json(user.into()))
}
