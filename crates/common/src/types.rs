use serde::{Deserialize, Serialize};

/// Platform identifier of a chat (group or private conversation).
pub type ChatId = i64;

/// Platform identifier of a user or bot account.
pub type UserId = i64;

/// Platform identifier of a single message within a chat.
pub type MessageId = i32;

/// Kind of conversation an update originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Basic groups and supergroups both count as group context.
    #[must_use]
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }

    #[must_use]
    pub fn is_private(self) -> bool {
        self == Self::Private
    }
}

/// A chat as seen by the moderation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRef {
    pub id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
}

impl ChatRef {
    /// Title used in notices and registry rows; untitled chats read as "Group".
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Group")
    }
}

/// A user (or bot) identity attached to an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
}
