//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations translate between Diesel
//!   models and domain types. Membership rules stay in the domain; adapters
//!   only persist the delta it reports.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are never exposed to the domain layer.
//! - **One transaction per compound operation**: rows that gate a decision
//!   are locked with `FOR UPDATE` or `FOR SHARE` inside the transaction.
//! - **Strongly typed errors**: Database errors map to port error types;
//!   unique violations on users map to `Duplicate { field }`.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/roleplay");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_group_repository;
mod diesel_group_request_repository;
mod diesel_password_reset_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_group_request_repository::DieselGroupRequestRepository;
pub use diesel_password_reset_repository::DieselPasswordResetRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
