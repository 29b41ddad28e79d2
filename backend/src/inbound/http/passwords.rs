//! Password recovery handlers.
//!
//! ```text
//! POST /api/v1/forgot-password {"email":"ada@example.com","resetPasswordUrl":"https://app/reset"}
//! POST /api/v1/reset-password {"token":"...","password":"new-secret"}
//! ```
//!
//! Both endpoints answer `204 No Content`. Recovery for an unknown address is
//! indistinguishable from a successful one.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{IssueTokenRequest, ResetPasswordRequest};
use crate::domain::{EmailAddress, Error, Password, ResetToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, map_password_validation_error, map_user_validation_error,
    require,
};

/// Request body for `POST /api/v1/forgot-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordBody {
    pub email: Option<String>,
    #[schema(example = "https://roleplay.example.com/reset")]
    pub reset_password_url: Option<String>,
}

/// Request body for `POST /api/v1/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    pub token: Option<String>,
    pub password: Option<String>,
}

const EMAIL: FieldName = FieldName::new("email");
const RESET_PASSWORD_URL: FieldName = FieldName::new("resetPasswordUrl");
const TOKEN: FieldName = FieldName::new("token");
const PASSWORD: FieldName = FieldName::new("password");

fn parse_issue_request(body: ForgotPasswordBody) -> Result<IssueTokenRequest, Error> {
    let email = require(body.email, EMAIL)?;
    let url = require(body.reset_password_url, RESET_PASSWORD_URL)?;
    let email = EmailAddress::new(&email).map_err(|err| map_user_validation_error(EMAIL, err))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(invalid_value_error(
            RESET_PASSWORD_URL,
            "resetPasswordUrl must not be empty",
        ));
    }
    Ok(IssueTokenRequest {
        email,
        reset_password_url: url.to_owned(),
    })
}

fn parse_reset_request(body: ResetPasswordBody) -> Result<ResetPasswordRequest, Error> {
    let token = require(body.token, TOKEN)?;
    let password = require(body.password, PASSWORD)?;
    let password =
        Password::new(&password).map_err(|err| map_password_validation_error(PASSWORD, err))?;
    let token = ResetToken::parse(&token).ok_or_else(|| Error::not_found("token not found"))?;
    Ok(ResetPasswordRequest { token, password })
}

/// Mail a password reset link.
#[utoipa::path(
    post,
    path = "/api/v1/forgot-password",
    request_body = ForgotPasswordBody,
    responses(
        (status = 204, description = "Recovery mail dispatched when the address is known"),
        (status = 422, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store or mail unavailable", body = ErrorSchema)
    ),
    tags = ["passwords"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_issue_request(payload.into_inner())?;
    state.password_resets.issue_token(request).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Redeem a reset token and replace the owner's password.
#[utoipa::path(
    post,
    path = "/api/v1/reset-password",
    request_body = ResetPasswordBody,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 404, description = "Unknown or consumed token", body = ErrorSchema),
        (status = 410, description = "Token has expired", body = ErrorSchema),
        (status = 422, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["passwords"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_reset_request(payload.into_inner())?;
    state.password_resets.reset_password(request).await?;
    Ok(HttpResponse::NoContent().finish())
}
