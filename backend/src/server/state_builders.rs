//! Builders wiring repositories into the driving-port services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    GroupRepository, GroupRequestRepository, PasswordResetRepository, UserRepository,
};
use backend::domain::{
    GroupRequestService, GroupService, PasswordResetService, UserAccountService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::mail::LoggingMailer;
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DieselGroupRepository, DieselGroupRequestRepository, DieselPasswordResetRepository,
    DieselUserRepository,
};
use backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Repository handles shared by every service.
struct Repositories<U, G, R, T> {
    users: Arc<U>,
    groups: Arc<G>,
    requests: Arc<R>,
    tokens: Arc<T>,
}

fn build_ports<U, G, R, T>(repos: Repositories<U, G, R, T>, mail_from: &str) -> HttpStatePorts
where
    U: UserRepository + 'static,
    G: GroupRepository + 'static,
    R: GroupRequestRepository + 'static,
    T: PasswordResetRepository + 'static,
{
    let Repositories {
        users,
        groups,
        requests,
        tokens,
    } = repos;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new());

    let accounts = Arc::new(UserAccountService::new(users.clone(), hasher.clone()));
    let group_service = Arc::new(GroupService::new(
        groups.clone(),
        users.clone(),
        clock.clone(),
    ));
    let request_service = Arc::new(GroupRequestService::new(
        requests,
        groups,
        users.clone(),
        clock.clone(),
    ));
    let password_resets = Arc::new(PasswordResetService::new(
        tokens,
        users,
        hasher,
        Arc::new(LoggingMailer),
        clock,
        mail_from,
    ));

    HttpStatePorts {
        login: accounts.clone(),
        accounts,
        groups: group_service.clone(),
        groups_query: group_service,
        group_requests: request_service.clone(),
        group_requests_query: request_service,
        password_resets,
    }
}

/// Build the handler state from the configured store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                groups: Arc::new(DieselGroupRepository::new(pool.clone())),
                requests: Arc::new(DieselGroupRequestRepository::new(pool.clone())),
                tokens: Arc::new(DieselPasswordResetRepository::new(pool.clone())),
            },
            &config.mail_from,
        ),
        None => {
            let store = Arc::new(MemoryStore::new());
            build_ports(
                Repositories {
                    users: store.clone(),
                    groups: store.clone(),
                    requests: store.clone(),
                    tokens: store,
                },
                &config.mail_from,
            )
        }
    };
    web::Data::new(HttpState::new(ports))
}
