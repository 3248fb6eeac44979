use std::path::PathBuf;

use crate::menu::ActionMenu;

/// How the platform should interpret message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    /// Telegram HTML subset; interpolated values must be escaped.
    #[default]
    Html,
    /// Sent verbatim.
    Plain,
}

/// A message to deliver: text, its format, and an optional button grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePlan {
    pub text: String,
    pub format: TextFormat,
    pub menu: Option<ActionMenu>,
}

impl MessagePlan {
    #[must_use]
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            menu: None,
        }
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            menu: None,
        }
    }

    #[must_use]
    pub fn with_menu(mut self, menu: ActionMenu) -> Self {
        self.menu = (!menu.is_empty()).then_some(menu);
        self
    }
}

/// Where an animation is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// File on local disk, uploaded with the request.
    Local(PathBuf),
    /// URL the platform fetches itself.
    Remote(String),
}
