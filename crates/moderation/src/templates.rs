//! Message text for every screen and notice.
//!
//! All functions return Telegram HTML unless noted otherwise; every
//! interpolated user-controlled value goes through [`escape_html`].

use chrono::{DateTime, Utc};

use {
    joinhider_common::{
        html::escape_html,
        types::{ChatId, UserId},
    },
    joinhider_config::BotConfig,
    joinhider_registry::{ManagedGroup, TargetClass},
};

/// Maximum groups listed in the chats view.
pub const CHATS_VIEW_LIMIT: usize = 50;

/// Values shared by most templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    /// Raw handle, for plain-text messages.
    pub support_channel: String,
    /// Handle escaped for HTML-mode messages.
    pub support_html: String,
    pub support_url: String,
    pub bot_username: Option<String>,
}

impl Branding {
    #[must_use]
    pub fn new(config: &BotConfig, bot_username: Option<String>) -> Self {
        Self {
            support_channel: config.support_channel.clone(),
            support_html: escape_html(&config.support_channel),
            support_url: config.support_url(),
            bot_username,
        }
    }

    /// Deep link that opens the "add to group" picker, when the bot's
    /// username is known.
    #[must_use]
    pub fn add_to_group_url(&self) -> Option<String> {
        self.bot_username
            .as_deref()
            .map(|name| format!("https://t.me/{name}?startgroup=true"))
    }
}

/// Counters shown by the stats screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub groups: u64,
    pub users: u64,
    pub group_broadcasts: u64,
    pub user_broadcasts: u64,
}

pub fn group_welcome(b: &Branding, title: &str) -> String {
    format!(
        "\
🎉 <b>Hello {title}!</b>

🤖 <b>I'm Join Hider Bot</b> - Your friendly group assistant!

✅ <b>I will automatically hide all join/leave messages</b>
✅ <b>No more spammy notifications</b>
✅ <b>Clean chat experience</b>

<b>To get started:</b>
1️⃣ Make me admin in this group
2️⃣ Grant me delete message permission
3️⃣ I'll start working automatically!

<b>Support:</b> {support}",
        title = escape_html(title),
        support = b.support_html,
    )
}

pub fn user_welcome(b: &Branding, first_name: &str, is_owner: bool) -> String {
    let mut text = format!(
        "\
🎉 <b>Welcome to Join Hider Bot!</b>

Hello <b>{name}</b>! I will hide join/leave messages in your groups.

<b>Features:</b>
✅ Hide new member join messages
✅ Hide member leave messages

<b>Support Channel:</b> {support}",
        name = escape_html(first_name),
        support = b.support_html,
    );
    if is_owner {
        text.push_str("\n\n<b>👑 Owner Panel:</b> You have access to admin features!");
    }
    text
}

pub fn anonymous_welcome(b: &Branding) -> String {
    format!(
        "\
🎉 <b>Welcome to Join Hider Bot!</b>

🤖 I will hide join/leave messages in your groups.

<b>Features:</b>
✅ Auto hide join/leave messages

<b>Support:</b> {}",
        b.support_html
    )
}

/// Unformatted last-resort welcome.
pub fn fallback_welcome(b: &Branding) -> String {
    format!(
        "🎉 Welcome to Join Hider Bot!\n\nSupport: {}",
        b.support_channel
    )
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn owner_agent_added(title: &str, chat_id: ChatId, at: DateTime<Utc>) -> String {
    format!(
        "✅ <b>Bot added to new group!</b>\n\n\
         <b>Group:</b> {}\n\
         <b>ID:</b> <code>{chat_id}</code>\n\
         <b>Date:</b> {}",
        escape_html(title),
        timestamp(at)
    )
}

pub fn owner_agent_removed(title: &str, chat_id: ChatId, at: DateTime<Utc>) -> String {
    format!(
        "❌ <b>Bot removed from group!</b>\n\n\
         <b>Group:</b> {}\n\
         <b>ID:</b> <code>{chat_id}</code>\n\
         <b>Date:</b> {}",
        escape_html(title),
        timestamp(at)
    )
}

pub fn stats_view(b: &Branding, stats: StatsSnapshot, owner_id: UserId) -> String {
    format!(
        "\
<b>📊 Bot Statistics</b>

<b>👥 Managed Groups:</b> {groups}
<b>👤 Total Users:</b> {users}
<b>📢 Group Broadcasts Sent:</b> {gb}
<b>📢 User Broadcasts Sent:</b> {ub}

<b>🆔 Owner ID:</b> {owner_id}
<b>🔧 Status:</b> ✅ Running
<b>💡 Support:</b> {support}",
        groups = stats.groups,
        users = stats.users,
        gb = stats.group_broadcasts,
        ub = stats.user_broadcasts,
        support = b.support_html,
    )
}

pub fn stats_command(b: &Branding, stats: StatsSnapshot) -> String {
    format!(
        "<b>📊 Statistics</b>\n\n\
         • <b>Managed Groups:</b> {}\n\
         • <b>Total Users:</b> {}\n\
         • <b>Support:</b> {}",
        stats.groups, stats.users, b.support_html
    )
}

/// Groups must already be sorted newest first.
pub fn chats_view(groups: &[ManagedGroup]) -> String {
    if groups.is_empty() {
        return "❌ No chats managed yet.\nAdd me to a group and make me admin!".to_string();
    }

    let mut list = groups
        .iter()
        .take(CHATS_VIEW_LIMIT)
        .map(|g| {
            format!(
                "• {} (<code>{}</code>) - {}",
                escape_html(&g.title),
                g.id,
                g.added_date.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    if groups.len() > CHATS_VIEW_LIMIT {
        list.push_str(&format!(
            "\n\n... and {} more groups",
            groups.len() - CHATS_VIEW_LIMIT
        ));
    }

    format!("<b>👥 Managed Chats</b>\n\n{list}")
}

pub fn group_settings_view(b: &Branding, title: &str) -> String {
    format!(
        "\
<b>⚙️ Group Settings - {title}</b>

<b>Bot Features:</b>
✅ Join messages hidden
✅ Leave messages hidden
✅ Welcome messages enabled

<b>Commands:</b>
/settings - Show settings
/start - Bot info

<b>Support:</b> {support}",
        title = escape_html(title),
        support = b.support_html,
    )
}

pub fn settings_command(b: &Branding, title: &str, chat_id: ChatId) -> String {
    format!(
        "\
<b>⚙️ Group Settings - {title}</b>

<b>Group ID:</b> <code>{chat_id}</code>

<b>Bot Features:</b>
✅ Join messages hidden
✅ Leave messages hidden
✅ Welcome messages enabled

<b>Support:</b> {support}",
        title = escape_html(title),
        support = b.support_html,
    )
}

pub fn settings_private_hint(b: &Branding) -> String {
    format!(
        "ℹ️ This command works only in groups!\n\n\
         Add me to a group and make me admin to use this feature.\n\n\
         <b>Support:</b> {}",
        b.support_html
    )
}

pub fn broadcast_menu_view(b: &Branding, target: TargetClass) -> String {
    let (heading, command, example) = match target {
        TargetClass::Groups => (
            "Broadcast to Groups",
            "gbroadcast",
            "Hello groups! New update available.",
        ),
        TargetClass::Users => (
            "Broadcast to Users",
            "broadcast",
            "Hello users! Check out new features.",
        ),
    };
    format!(
        "<b>📢 {heading}</b>\n\n\
         Please use command:\n\
         <code>/{command} your_message_here</code>\n\n\
         <b>Example:</b>\n\
         <code>/{command} {example}</code>\n\n\
         <b>Support Channel:</b> {}",
        b.support_html
    )
}

pub fn help_view(b: &Branding) -> String {
    format!(
        "\
<b>🆘 Help Guide</b>

<b>How to use this bot:</b>
1. Add me to your group
2. Make me admin with delete permissions
3. I'll automatically hide join/leave messages

<b>Owner Commands:</b>
/start - Bot menu
/stats - View statistics

<b>Support:</b>
If you need help, join our support channel: {}

<b>Features:</b>
• Auto hide join messages
• Auto hide leave messages",
        b.support_html
    )
}

/// Plain-text rejection for owner-only commands.
pub fn command_rejected(b: &Branding) -> String {
    format!(
        "❌ Only owner can use this command.\n\n💡 Support: {}",
        b.support_channel
    )
}

/// Plain-text rejection for the stats command.
pub fn stats_rejected(b: &Branding) -> String {
    format!(
        "❌ Only owner can view statistics.\n\n💡 Support: {}",
        b.support_channel
    )
}

/// Plain-text rejection for an owner-only menu view.
pub fn view_rejected(view: crate::views::View) -> &'static str {
    use crate::views::View;
    match view {
        View::Stats => "❌ Only owner can view statistics!",
        View::Chats => "❌ Only owner can view managed chats!",
        View::BroadcastMenu | View::GroupBroadcastMenu => "❌ Only owner can broadcast messages!",
        View::Welcome | View::GroupSettings | View::Help => "❌ Only owner can do that!",
    }
}

pub fn broadcast_usage(b: &Branding, target: TargetClass) -> String {
    let (command, example) = match target {
        TargetClass::Groups => ("gbroadcast", "Hello everyone! New update available."),
        TargetClass::Users => ("broadcast", "Hello users! New features added."),
    };
    format!(
        "<b>📢 Usage:</b> /{command} your_message_here\n\n\
         <b>Example:</b> /{command} {example}\n\n\
         💡 Support: {}",
        b.support_html
    )
}

/// Plain text.
pub fn broadcast_no_recipients(target: TargetClass) -> &'static str {
    match target {
        TargetClass::Groups => "❌ No groups found to broadcast!",
        TargetClass::Users => "❌ No users found to broadcast!",
    }
}

fn recipient_noun(target: TargetClass) -> &'static str {
    match target {
        TargetClass::Groups => "groups",
        TargetClass::Users => "users",
    }
}

/// Plain text.
pub fn broadcast_progress(target: TargetClass, total: usize) -> String {
    format!(
        "🔄 Broadcasting to {total} {}...\nPlease wait...",
        recipient_noun(target)
    )
}

pub fn broadcast_summary(
    b: &Branding,
    target: TargetClass,
    total: usize,
    succeeded: usize,
    failed: usize,
) -> String {
    let label = match target {
        TargetClass::Groups => "Total Groups",
        TargetClass::Users => "Total Users",
    };
    format!(
        "<b>✅ Broadcast Complete</b>\n\n\
         <b>{label}:</b> {total}\n\
         <b>Successful:</b> {succeeded}\n\
         <b>Failed:</b> {failed}\n\n\
         💡 Support: {}",
        b.support_html
    )
}
