//! Inline-menu navigation as a small state machine.
//!
//! Menu buttons carry opaque callback tokens; [`ViewToken`] is their parsed
//! form and [`transition`] maps the view a menu was attached to plus the
//! pressed token onto the view to show next.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Callback tokens carried by menu buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewToken {
    Stats,
    Chats,
    GroupSettings,
    BroadcastMenu,
    GroupBroadcastMenu,
    Help,
    Back,
}

impl ViewToken {
    pub const ALL: [Self; 7] = [
        Self::Stats,
        Self::Chats,
        Self::GroupSettings,
        Self::BroadcastMenu,
        Self::GroupBroadcastMenu,
        Self::Help,
        Self::Back,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::Chats => "chats",
            Self::GroupSettings => "group_settings",
            Self::BroadcastMenu => "broadcast_menu",
            Self::GroupBroadcastMenu => "gbroadcast_menu",
            Self::Help => "help",
            Self::Back => "back",
        }
    }

    /// View a token opens directly; `back` depends on navigation instead.
    #[must_use]
    pub fn target(self) -> Option<View> {
        match self {
            Self::Stats => Some(View::Stats),
            Self::Chats => Some(View::Chats),
            Self::GroupSettings => Some(View::GroupSettings),
            Self::BroadcastMenu => Some(View::BroadcastMenu),
            Self::GroupBroadcastMenu => Some(View::GroupBroadcastMenu),
            Self::Help => Some(View::Help),
            Self::Back => None,
        }
    }
}

impl fmt::Display for ViewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::unknown_token(s))
    }
}

/// Screens reachable through inline menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Welcome,
    Stats,
    Chats,
    GroupSettings,
    BroadcastMenu,
    GroupBroadcastMenu,
    Help,
}

impl View {
    /// Views only the owner may open.
    #[must_use]
    pub fn requires_owner(self) -> bool {
        matches!(
            self,
            Self::Stats | Self::Chats | Self::BroadcastMenu | Self::GroupBroadcastMenu
        )
    }

    /// Views that only make sense inside a group chat.
    #[must_use]
    pub fn requires_group(self) -> bool {
        self == Self::GroupSettings
    }
}

/// Next view after pressing `token` on a menu showing `current`.
///
/// `back` always returns to the welcome screen.
#[must_use]
pub fn transition(current: View, token: ViewToken) -> View {
    match token {
        ViewToken::Back => View::Welcome,
        other => other.target().unwrap_or(current),
    }
}
