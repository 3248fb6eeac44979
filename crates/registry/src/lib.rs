//! Durable state for the bot: the membership registry of known groups and
//! private-chat users, and the append-only broadcast audit log.
//!
//! Both live in one SQLite database (`bot_data.db` by default). An in-memory
//! implementation of the same traits backs unit tests elsewhere in the
//! workspace.

pub mod error;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;
pub mod types;

pub use {
    error::{Error, Result},
    store::{AuditLog, MembershipRegistry},
    types::{BroadcastRecord, KnownUser, ManagedGroup, TargetClass},
};

/// Run database migrations for the registry crate.
///
/// Creates the `managed_groups`, `known_users` and `broadcast_records` tables
/// when absent. Safe to call on every startup.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
