//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GroupCommand, GroupQuery, GroupRequestCommand, GroupRequestQuery, LoginService,
    PasswordResetCommand, UserAccountCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccountCommand>,
    pub groups: Arc<dyn GroupCommand>,
    pub groups_query: Arc<dyn GroupQuery>,
    pub group_requests: Arc<dyn GroupRequestCommand>,
    pub group_requests_query: Arc<dyn GroupRequestQuery>,
    pub password_resets: Arc<dyn PasswordResetCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccountCommand>,
    pub groups: Arc<dyn GroupCommand>,
    pub groups_query: Arc<dyn GroupQuery>,
    pub group_requests: Arc<dyn GroupRequestCommand>,
    pub group_requests_query: Arc<dyn GroupRequestQuery>,
    pub password_resets: Arc<dyn PasswordResetCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// A single service value usually backs several ports, so callers clone
    /// one `Arc` into each slot:
    ///
    /// ```ignore
    /// let groups = Arc::new(GroupService::new(repo, users, clock));
    /// let ports = HttpStatePorts {
    ///     groups: groups.clone(),
    ///     groups_query: groups,
    ///     ..
    /// };
    /// let state = HttpState::new(ports);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            groups,
            groups_query,
            group_requests,
            group_requests_query,
            password_resets,
        } = ports;
        Self {
            login,
            accounts,
            groups,
            groups_query,
            group_requests,
            group_requests_query,
            password_resets,
        }
    }
}
