//! Session login and logout handlers.
//!
//! ```text
//! POST /api/v1/sessions {"email":"ada@example.com","password":"secret"}
//! DELETE /api/v1/sessions
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserEnvelope;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, map_password_validation_error, require,
};

/// Login request body for `POST /api/v1/sessions`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => invalid_value_error(EMAIL, err.to_string()),
        other => map_password_validation_error(PASSWORD, other),
    }
}

fn parse_credentials(body: LoginBody) -> Result<LoginCredentials, Error> {
    let email = require(body.email, EMAIL)?;
    let password = require(body.password, PASSWORD)?;
    LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = UserEnvelope,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "login",
    security([])
)]
#[post("/sessions")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let credentials = parse_credentials(payload.into_inner())?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(user.into()))
}

/// End the current session.
#[utoipa::path(
    delete,
    path = "/api/v1/sessions",
    responses((status = 204, description = "Session cleared")),
    tags = ["sessions"],
    operation_id = "logout"
)]
#[delete("/sessions")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
