//! Shared helpers for the behaviour suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls this module in with `mod support;`. It wires the real
//! account service over the in-memory store and keeps registered players
//! addressable by name.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use backend::domain::ports::{RegisterUserRequest, UserAccountCommand};
use backend::domain::{EmailAddress, Password, User, UserAccountService, Username};
use backend::outbound::memory::MemoryStore;
use backend::outbound::security::Argon2PasswordHasher;
use backend::test_support::fast_hasher;
use tokio::runtime::Runtime;

/// Password every player registers with.
pub const INITIAL_PASSWORD: &str = "correct horse battery staple";

/// Accounts and storage shared by the services under test.
pub struct Backend {
    runtime: Runtime,
    pub store: Arc<MemoryStore>,
    pub hasher: Arc<Argon2PasswordHasher>,
    pub accounts: Arc<UserAccountService<MemoryStore, Argon2PasswordHasher>>,
    players: HashMap<String, User>,
}

impl Backend {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let hasher = Arc::new(fast_hasher());
        let accounts = Arc::new(UserAccountService::new(store.clone(), hasher.clone()));
        Self {
            runtime: Runtime::new().expect("tokio runtime"),
            store,
            hasher,
            accounts,
            players: HashMap::new(),
        }
    }

    /// Drive `future` to completion on the suite's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Register `name` with a derived email address.
    pub fn register(&mut self, name: &str) -> User {
        let request = RegisterUserRequest {
            username: Username::new(name).expect("username"),
            email: email_for(name),
            password: Password::new(INITIAL_PASSWORD).expect("password"),
            avatar: None,
        };
        let user = self
            .block_on(self.accounts.register(request))
            .expect("registration succeeds");
        self.players.insert(name.to_owned(), user.clone());
        user
    }

    /// A previously registered player.
    pub fn player(&self, name: &str) -> &User {
        self.players
            .get(name)
            .unwrap_or_else(|| panic!("player {name} should be registered"))
    }
}

/// Email address assigned to `name` at registration.
pub fn email_for(name: &str) -> EmailAddress {
    EmailAddress::new(format!("{name}@example.com")).expect("email")
}

/// Snake-case wire name of an error code.
pub fn code_name(error: &backend::domain::Error) -> String {
    serde_json::to_value(error.code())
        .ok()
        .and_then(|value| value.as_str().map(str::to_owned))
        .expect("error codes serialise as strings")
}
