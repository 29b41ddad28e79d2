//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test as actix_test, web};
use serde_json::Value;

use crate::domain::ports::{
    MockGroupCommand, MockGroupQuery, MockGroupRequestCommand, MockGroupRequestQuery,
    MockLoginService, MockPasswordResetCommand, MockUserAccountCommand,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{api_routes, validation::json_config};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports; any call without an expectation fails the test.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockUserAccountCommand,
    pub groups: MockGroupCommand,
    pub groups_query: MockGroupQuery,
    pub group_requests: MockGroupRequestCommand,
    pub group_requests_query: MockGroupRequestQuery,
    pub password_resets: MockPasswordResetCommand,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            groups: Arc::new(self.groups),
            groups_query: Arc::new(self.groups_query),
            group_requests: Arc::new(self.group_requests),
            group_requests_query: Arc::new(self.group_requests_query),
            password_resets: Arc::new(self.password_resets),
        }))
    }
}

/// Full `/api/v1` surface over `ports`, plus `/test-login/{id}` which puts
/// the given user in the session.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .app_data(json_config())
        .wrap(test_session_middleware())
        .route(
            "/test-login/{id}",
            web::get().to(|session: SessionContext, path: web::Path<String>| async move {
                let id = UserId::new(path.as_str()).expect("test login id");
                session.persist_user(&id)?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
        .service(web::scope("/api/v1").configure(api_routes))
}

/// Log `user` in through the test route and return the session cookie.
pub async fn login_as<S>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::get()
            .uri(&format!("/test-login/{user}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Read a response body as JSON.
pub async fn body_json(res: ServiceResponse) -> Value {
    let body = actix_test::read_body(res).await;
    serde_json::from_slice(&body).expect("JSON body")
}
