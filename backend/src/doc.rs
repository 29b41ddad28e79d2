//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! request and response bodies from the inbound adapter, and the session
//! cookie security scheme. Swagger UI serves it at `/docs` in debug builds.

use crate::inbound::http::group_requests::{
    GroupRequestBody, GroupRequestEnvelope, GroupRequestsEnvelope, ListedGroupRequestBody,
    RequestGroupBody, RequestUserBody,
};
use crate::inbound::http::groups::{
    GroupBody, GroupBodyInput, GroupEnvelope, GroupsEnvelope, MasterUserBody, PlayerBody,
};
use crate::inbound::http::passwords::{ForgotPasswordBody, ResetPasswordBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::sessions::LoginBody;
use crate::inbound::http::users::{RegisterUserBody, UpdateUserBody, UserBody, UserEnvelope};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/sessions.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roleplay backend API",
        description = "Users, roleplay groups, join requests and password recovery."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::sessions::login,
        crate::inbound::http::sessions::logout,
        crate::inbound::http::groups::create_group,
        crate::inbound::http::groups::list_groups,
        crate::inbound::http::groups::get_group,
        crate::inbound::http::groups::update_group,
        crate::inbound::http::groups::delete_group,
        crate::inbound::http::groups::remove_player,
        crate::inbound::http::group_requests::create_request,
        crate::inbound::http::group_requests::list_requests,
        crate::inbound::http::group_requests::accept_request,
        crate::inbound::http::group_requests::reject_request,
        crate::inbound::http::passwords::forgot_password,
        crate::inbound::http::passwords::reset_password,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterUserBody,
        UpdateUserBody,
        UserBody,
        UserEnvelope,
        LoginBody,
        GroupBodyInput,
        GroupBody,
        GroupEnvelope,
        GroupsEnvelope,
        MasterUserBody,
        PlayerBody,
        GroupRequestBody,
        GroupRequestEnvelope,
        GroupRequestsEnvelope,
        ListedGroupRequestBody,
        RequestGroupBody,
        RequestUserBody,
        ForgotPasswordBody,
        ResetPasswordBody,
    )),
    tags(
        (name = "users", description = "Account registration and profile updates"),
        (name = "sessions", description = "Cookie session login and logout"),
        (name = "groups", description = "Roleplay groups and their players"),
        (name = "group requests", description = "Requests to join a group"),
        (name = "passwords", description = "Password recovery"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        let error_schema = schemas.get("crate.domain.Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    fn group_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let group = schemas.get("GroupBody").expect("GroupBody schema");

        assert_object_schema_has_field(group, "createdAt");
        assert_object_schema_has_field(group, "masterUser");
        assert_object_schema_has_field(group, "players");
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/{id}")]
    #[case("/api/v1/sessions")]
    #[case("/api/v1/groups")]
    #[case("/api/v1/groups/{id}")]
    #[case("/api/v1/groups/{id}/players/{playerId}")]
    #[case("/api/v1/groups/{id}/requests")]
    #[case("/api/v1/groups/{id}/requests/{requestId}")]
    #[case("/api/v1/groups/{id}/requests/{requestId}/accept")]
    #[case("/api/v1/forgot-password")]
    #[case("/api/v1/reset-password")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
