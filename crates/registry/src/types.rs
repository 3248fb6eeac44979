use std::{fmt, str::FromStr};

use {
    chrono::{DateTime, SecondsFormat, Utc},
    serde::{Deserialize, Serialize},
};

use joinhider_common::types::{ChatId, UserId};

use crate::error::Error;

/// A group conversation the bot has joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedGroup {
    pub id: ChatId,
    pub title: String,
    pub added_date: DateTime<Utc>,
}

/// A user who has talked to the bot in a private chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownUser {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
    pub joined_date: DateTime<Utc>,
}

/// Recipient class of a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetClass {
    Groups,
    Users,
}

impl TargetClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groups => "groups",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groups" => Ok(Self::Groups),
            "users" => Ok(Self::Users),
            other => Err(Error::unknown_target(other)),
        }
    }
}

/// One completed broadcast in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRecord {
    pub id: i64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub target_class: TargetClass,
}

/// Fixed-width RFC 3339 so lexicographic order in SQLite matches time order.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(table: &'static str, value: String) -> crate::Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
        Err(source) => Err(Error::Timestamp {
            table,
            value,
            source,
        }),
    }
}
