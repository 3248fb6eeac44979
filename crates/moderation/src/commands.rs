//! Slash-command parsing.

use joinhider_registry::TargetClass;

/// Commands registered with the platform, in menu order.
pub const COMMAND_DESCRIPTIONS: [(&str, &str); 5] = [
    ("start", "Start the bot"),
    ("stats", "View statistics (owner only)"),
    ("broadcast", "Broadcast to users (owner only)"),
    ("gbroadcast", "Broadcast to groups (owner only)"),
    ("settings", "Group settings"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stats,
    /// Broadcast to private-chat users.
    Broadcast(String),
    /// Broadcast to managed groups.
    GroupBroadcast(String),
    Settings,
}

impl Command {
    /// Parse a message text such as `/gbroadcast@my_bot hello  world`.
    ///
    /// Commands addressed to another bot are ignored. Arguments are
    /// re-joined with single spaces.
    #[must_use]
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let mut words = rest.split_whitespace();
        let head = words.next()?;
        let (name, addressee) = match head.split_once('@') {
            Some((name, to)) => (name, Some(to)),
            None => (head, None),
        };
        if let (Some(to), Some(me)) = (addressee, bot_username)
            && !to.eq_ignore_ascii_case(me)
        {
            return None;
        }
        let args = words.collect::<Vec<_>>().join(" ");

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "stats" => Some(Self::Stats),
            "broadcast" => Some(Self::Broadcast(args)),
            "gbroadcast" => Some(Self::GroupBroadcast(args)),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }

    /// Broadcast target and text, for the two broadcast commands.
    #[must_use]
    pub fn broadcast(&self) -> Option<(TargetClass, &str)> {
        match self {
            Self::Broadcast(text) => Some((TargetClass::Users, text)),
            Self::GroupBroadcast(text) => Some((TargetClass::Groups, text)),
            Self::Start | Self::Stats | Self::Settings => None,
        }
    }
}
