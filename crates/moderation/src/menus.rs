//! Inline button layouts for each screen.

use joinhider_channels::{ActionMenu, MenuButton};

use crate::{templates::Branding, views::ViewToken};

fn support(b: &Branding) -> MenuButton {
    MenuButton::url("📢 Support Channel", &b.support_url)
}

fn callback(label: &str, token: ViewToken) -> MenuButton {
    MenuButton::callback(label, token.as_str())
}

fn add_to_group(b: &Branding) -> Option<MenuButton> {
    b.add_to_group_url()
        .map(|url| MenuButton::url("➕ Add to Group", url))
}

/// Support link plus help; attached to every fallback welcome.
#[must_use]
pub fn minimal(b: &Branding) -> ActionMenu {
    ActionMenu::new()
        .row([support(b)])
        .row([callback("🆘 Help", ViewToken::Help)])
}

#[must_use]
pub fn group_welcome(b: &Branding) -> ActionMenu {
    ActionMenu::new().row([support(b)]).row([
        callback("⚙️ Settings", ViewToken::GroupSettings),
        callback("🆘 Help", ViewToken::Help),
    ])
}

#[must_use]
pub fn user_welcome(b: &Branding, is_owner: bool) -> ActionMenu {
    if is_owner {
        return ActionMenu::new()
            .row([
                callback("📊 Stats", ViewToken::Stats),
                callback("📢 Broadcast", ViewToken::BroadcastMenu),
            ])
            .row([
                callback("👥 Managed Groups", ViewToken::Chats),
                callback("📢 Group Broadcast", ViewToken::GroupBroadcastMenu),
            ])
            .row([support(b)])
            .row(
                std::iter::once(callback("🆘 Help", ViewToken::Help)).chain(add_to_group(b)),
            );
    }
    ActionMenu::new()
        .row([support(b)])
        .row(std::iter::once(callback("🆘 Help", ViewToken::Help)).chain(add_to_group(b)))
}

/// Sub-screens: support link and a way back to the welcome.
#[must_use]
pub fn sub_view(b: &Branding) -> ActionMenu {
    ActionMenu::new()
        .row([support(b)])
        .row([callback("🔙 Back", ViewToken::Back)])
}

#[must_use]
pub fn owner_added_notice() -> ActionMenu {
    ActionMenu::new().row([
        callback("👥 View Groups", ViewToken::Chats),
        callback("📊 Stats", ViewToken::Stats),
    ])
}
