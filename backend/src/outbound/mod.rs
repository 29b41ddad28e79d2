//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: arena store guarded by one mutex; the default backing store
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2id password hashing
//! - **mail**: log-only mail dispatch
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
pub mod memory;
pub mod persistence;
pub mod security;
