//! In-memory arena store implementing every repository port.
//!
//! One [`std::sync::Mutex`] guards all tables. Each repository call performs
//! its whole read-check-write sequence inside a single lock acquisition and
//! never awaits while holding it, so the compound operations the ports
//! promise (request creation, acceptance, group deletion, token redemption)
//! are atomic with respect to each other. The single lock also serialises
//! calls on unrelated groups and tokens; the PostgreSQL adapter locks rows
//! instead.
//!
//! The store backs the service when no database URL is configured and drives
//! the behaviour tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{
    Group, GroupId, GroupRequest, GroupRequestId, PasswordHash, PasswordResetToken, User, UserId,
};

mod group_requests;
mod groups;
mod password_resets;
mod users;

const POISONED: &str = "memory store lock poisoned";

struct UserRow {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserRow>,
    groups: HashMap<GroupId, Group>,
    requests: HashMap<GroupRequestId, GroupRequest>,
    tokens: HashMap<String, PasswordResetToken>,
}

impl Tables {
    fn groups_in_order<'a>(&'a self, keep: impl Fn(&Group) -> bool) -> Vec<&'a Group> {
        let mut groups: Vec<&Group> = self.groups.values().filter(|g| keep(g)).collect();
        groups.sort_by_key(|group| (group.created_at(), *group.id()));
        groups
    }
}

/// Shared in-memory store.
///
/// Clone the surrounding `Arc` to hand the same store to every service.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables.lock().map_err(|_| POISONED.to_owned())
    }
}
