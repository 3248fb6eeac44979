//! SQLite-backed registry and audit log using sqlx.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    sqlx::{SqlitePool, sqlite::SqlitePoolOptions},
    tracing::debug,
};

use joinhider_common::types::{ChatId, UserId};

use crate::{
    Result,
    store::{AuditLog, MembershipRegistry},
    types::{
        BroadcastRecord, KnownUser, ManagedGroup, TargetClass, format_timestamp, parse_timestamp,
    },
};

/// SQLite persistence for groups, users and broadcast records.
///
/// Holds a long-lived pool; connections are checked out per statement and
/// returned on every exit path.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        crate::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store using an existing pool (migrations must already be run).
    ///
    /// Call [`crate::run_migrations`] before using this constructor.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MembershipRegistry for SqliteStore {
    async fn upsert_group_on_add(&self, id: ChatId, title: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "INSERT INTO managed_groups (id, title, added_date) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 added_date = excluded.added_date",
        )
        .bind(id)
        .bind(title)
        .bind(format_timestamp(at))
        .execute(&self.pool)
        .await?;
        debug!(chat_id = id, "group registered (replace)");
        Ok(())
    }

    async fn upsert_group_if_absent(
        &self,
        id: ChatId,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO managed_groups (id, title, added_date) VALUES (?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(format_timestamp(at))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_user_if_absent(
        &self,
        id: UserId,
        username: Option<&str>,
        first_name: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO known_users (id, username, first_name, joined_date)
             VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(first_name)
        .bind(format_timestamp(at))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_groups(&self) -> Result<Vec<ManagedGroup>> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, title, added_date FROM managed_groups ORDER BY added_date DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, title, added)| -> Result<ManagedGroup> {
                Ok(ManagedGroup {
                    id,
                    title,
                    added_date: parse_timestamp("managed_groups", added)?,
                })
            })
            .collect()
    }

    async fn list_users(&self) -> Result<Vec<KnownUser>> {
        let rows = sqlx::query_as::<_, (i64, Option<String>, String, String)>(
            "SELECT id, username, first_name, joined_date FROM known_users",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, username, first_name, joined)| -> Result<KnownUser> {
                Ok(KnownUser {
                    id,
                    username,
                    first_name,
                    joined_date: parse_timestamp("known_users", joined)?,
                })
            })
            .collect()
    }

    async fn count_groups(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM managed_groups")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn count_users(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM known_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl AuditLog for SqliteStore {
    async fn append(
        &self,
        message: &str,
        at: DateTime<Utc>,
        target: TargetClass,
    ) -> Result<BroadcastRecord> {
        let result = sqlx::query(
            "INSERT INTO broadcast_records (message, timestamp, target_class) VALUES (?, ?, ?)",
        )
        .bind(message)
        .bind(format_timestamp(at))
        .bind(target.as_str())
        .execute(&self.pool)
        .await?;

        Ok(BroadcastRecord {
            id: result.last_insert_rowid(),
            message: message.to_string(),
            timestamp: at,
            target_class: target,
        })
    }

    async fn count_by_target(&self, target: TargetClass) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM broadcast_records WHERE target_class = ?")
                .bind(target.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }
}
