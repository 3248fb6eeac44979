//! In-memory store for testing.

use std::{collections::HashMap, sync::Mutex};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
};

use joinhider_common::types::{ChatId, UserId};

use crate::{
    Result,
    store::{AuditLog, MembershipRegistry},
    types::{BroadcastRecord, KnownUser, ManagedGroup, TargetClass},
};

/// In-memory store backed by `HashMap`. No persistence — for tests only.
#[derive(Default)]
pub struct InMemoryStore {
    groups: Mutex<HashMap<ChatId, ManagedGroup>>,
    users: Mutex<HashMap<UserId, KnownUser>>,
    broadcasts: Mutex<Vec<BroadcastRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every audit record in insertion order.
    pub fn broadcasts(&self) -> Vec<BroadcastRecord> {
        self.broadcasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MembershipRegistry for InMemoryStore {
    async fn upsert_group_on_add(&self, id: ChatId, title: &str, at: DateTime<Utc>) -> Result<()> {
        let mut groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        groups.insert(id, ManagedGroup {
            id,
            title: title.to_string(),
            added_date: at,
        });
        Ok(())
    }

    async fn upsert_group_if_absent(
        &self,
        id: ChatId,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        if groups.contains_key(&id) {
            return Ok(false);
        }
        groups.insert(id, ManagedGroup {
            id,
            title: title.to_string(),
            added_date: at,
        });
        Ok(true)
    }

    async fn upsert_user_if_absent(
        &self,
        id: UserId,
        username: Option<&str>,
        first_name: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        if users.contains_key(&id) {
            return Ok(false);
        }
        users.insert(id, KnownUser {
            id,
            username: username.map(str::to_string),
            first_name: first_name.to_string(),
            joined_date: at,
        });
        Ok(true)
    }

    async fn list_groups(&self) -> Result<Vec<ManagedGroup>> {
        let groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<_> = groups.values().cloned().collect();
        out.sort_by(|a, b| b.added_date.cmp(&a.added_date).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn list_users(&self) -> Result<Vec<KnownUser>> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<_> = users.values().cloned().collect();
        out.sort_by_key(|u| u.id);
        Ok(out)
    }

    async fn count_groups(&self) -> Result<u64> {
        let groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        Ok(groups.len() as u64)
    }

    async fn count_users(&self) -> Result<u64> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.len() as u64)
    }
}

#[async_trait]
impl AuditLog for InMemoryStore {
    async fn append(
        &self,
        message: &str,
        at: DateTime<Utc>,
        target: TargetClass,
    ) -> Result<BroadcastRecord> {
        let mut broadcasts = self.broadcasts.lock().unwrap_or_else(|e| e.into_inner());
        let record = BroadcastRecord {
            id: broadcasts.len() as i64 + 1,
            message: message.to_string(),
            timestamp: at,
            target_class: target,
        };
        broadcasts.push(record.clone());
        Ok(record)
    }

    async fn count_by_target(&self, target: TargetClass) -> Result<u64> {
        let broadcasts = self.broadcasts.lock().unwrap_or_else(|e| e.into_inner());
        Ok(broadcasts
            .iter()
            .filter(|r| r.target_class == target)
            .count() as u64)
    }
}
