//! HTTP inbound adapter exposing the REST API under `/api/v1`.
//!
//! Handlers parse transport input into domain requests, call a driving port
//! held by [`state::HttpState`] and map the result back to JSON. Status codes
//! for domain errors are decided in [`error`].

use actix_web::web;

pub mod error;
pub mod group_requests;
pub mod groups;
pub mod health;
pub mod passwords;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope.
///
/// `/groups` is registered ahead of `/groups/{id}` so the collection routes
/// are matched first.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(users::update_user)
        .service(sessions::login)
        .service(sessions::logout)
        .service(groups::create_group)
        .service(groups::list_groups)
        .service(groups::get_group)
        .service(groups::update_group)
        .service(groups::delete_group)
        .service(groups::remove_player)
        .service(group_requests::create_request)
        .service(group_requests::list_requests)
        .service(group_requests::accept_request)
        .service(group_requests::reject_request)
        .service(passwords::forgot_password)
        .service(passwords::reset_password);
}
