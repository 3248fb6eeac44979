//! Persistence traits for the registry and the audit log.
//!
//! Every method is a single atomic read or write; callers never need
//! multi-statement transactions.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
};

use joinhider_common::types::{ChatId, UserId};

use crate::{
    Result,
    types::{BroadcastRecord, KnownUser, ManagedGroup, TargetClass},
};

/// Known groups and private-chat users. Nothing is ever deleted.
#[async_trait]
pub trait MembershipRegistry: Send + Sync {
    /// Insert the group, replacing title and date if it already exists.
    async fn upsert_group_on_add(&self, id: ChatId, title: &str, at: DateTime<Utc>) -> Result<()>;

    /// Insert the group only if unknown. Returns whether a row was written.
    async fn upsert_group_if_absent(
        &self,
        id: ChatId,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Insert the user only if unknown; the first contact's data is kept.
    async fn upsert_user_if_absent(
        &self,
        id: UserId,
        username: Option<&str>,
        first_name: &str,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    /// All groups, most recently registered first.
    async fn list_groups(&self) -> Result<Vec<ManagedGroup>>;

    /// All users, in no particular order.
    async fn list_users(&self) -> Result<Vec<KnownUser>>;

    async fn count_groups(&self) -> Result<u64>;

    async fn count_users(&self) -> Result<u64>;
}

/// Append-only record of completed broadcasts.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(
        &self,
        message: &str,
        at: DateTime<Utc>,
        target: TargetClass,
    ) -> Result<BroadcastRecord>;

    async fn count_by_target(&self, target: TargetClass) -> Result<u64>;
}
