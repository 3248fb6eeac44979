//! Welcome delivery and owner notices.
//!
//! [`NotificationDispatcher::deliver_welcome`] walks an ordered fallback
//! chain and reports the result as a `bool`; transport errors never escape
//! it. Owner notices are best-effort and only logged on failure.

use std::{path::PathBuf, sync::Arc};

use {
    chrono::{DateTime, Utc},
    tracing::{debug, info, warn},
};

use {
    joinhider_channels::{ActionMenu, ChatTransport, MediaSource, SentMessage, TextFormat},
    joinhider_common::types::{ChatId, UserId},
    joinhider_config::BotConfig,
};

use crate::{
    menus,
    templates::{self, Branding},
};

/// Where the welcome animation can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMedia {
    pub local: PathBuf,
    pub remote: Option<String>,
}

impl WelcomeMedia {
    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            local: config.welcome_asset.clone(),
            remote: config.animation_url.clone(),
        }
    }
}

/// Audience of a welcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WelcomeContext {
    /// The bot was just added to, or `/start` was sent in, a group.
    Group { title: String },
    /// `/start` in a private chat.
    User { first_name: String, is_owner: bool },
    /// Sender unknown, e.g. an anonymous group admin in a private context.
    Anonymous,
}

pub struct NotificationDispatcher {
    transport: Arc<dyn ChatTransport>,
    branding: Branding,
    media: WelcomeMedia,
    owner: Option<UserId>,
}

impl NotificationDispatcher {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        branding: Branding,
        media: WelcomeMedia,
        owner: Option<UserId>,
    ) -> Self {
        Self {
            transport,
            branding,
            media,
            owner,
        }
    }

    #[must_use]
    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    fn welcome_caption(&self, ctx: &WelcomeContext) -> (String, ActionMenu) {
        let b = &self.branding;
        match ctx {
            WelcomeContext::Group { title } => {
                (templates::group_welcome(b, title), menus::group_welcome(b))
            },
            WelcomeContext::User {
                first_name,
                is_owner,
            } => (
                templates::user_welcome(b, first_name, *is_owner),
                menus::user_welcome(b, *is_owner),
            ),
            WelcomeContext::Anonymous => (templates::anonymous_welcome(b), menus::minimal(b)),
        }
    }

    /// Send the welcome for `ctx` to `chat_id`.
    ///
    /// Tiers, first success wins: local animation, remote animation, HTML
    /// text with the minimal menu, unformatted short text with the minimal
    /// menu. Returns `false` only when every tier failed.
    pub async fn deliver_welcome(&self, chat_id: ChatId, ctx: &WelcomeContext) -> bool {
        self.try_deliver_welcome(chat_id, ctx).await.is_some()
    }

    async fn try_deliver_welcome(
        &self,
        chat_id: ChatId,
        ctx: &WelcomeContext,
    ) -> Option<SentMessage> {
        let (caption, menu) = self.welcome_caption(ctx);

        if tokio::fs::try_exists(&self.media.local)
            .await
            .unwrap_or(false)
        {
            let source = MediaSource::Local(self.media.local.clone());
            match self
                .transport
                .send_animation(chat_id, &source, Some(&caption), TextFormat::Html, Some(&menu))
                .await
            {
                Ok(sent) => return Some(sent),
                Err(e) => debug!(chat_id, error = %e, "local welcome animation failed"),
            }
        }

        if let Some(url) = &self.media.remote {
            let source = MediaSource::Remote(url.clone());
            match self
                .transport
                .send_animation(chat_id, &source, Some(&caption), TextFormat::Html, Some(&menu))
                .await
            {
                Ok(sent) => return Some(sent),
                Err(e) => debug!(chat_id, error = %e, "remote welcome animation failed"),
            }
        }

        let minimal = menus::minimal(&self.branding);
        match self
            .transport
            .send_text(chat_id, &caption, TextFormat::Html, Some(&minimal))
            .await
        {
            Ok(sent) => return Some(sent),
            Err(e) => warn!(chat_id, error = %e, "text welcome failed"),
        }

        match self
            .transport
            .send_text(
                chat_id,
                &templates::fallback_welcome(&self.branding),
                TextFormat::Plain,
                Some(&minimal),
            )
            .await
        {
            Ok(sent) => Some(sent),
            Err(e) => {
                warn!(chat_id, error = %e, "welcome undeliverable");
                None
            },
        }
    }

    /// Tell the owner the bot joined a group.
    pub async fn notify_owner_added(&self, chat_id: ChatId, title: &str, at: DateTime<Utc>) {
        let text = templates::owner_agent_added(title, chat_id, at);
        self.notify_owner(&text, Some(&menus::owner_added_notice()))
            .await;
    }

    /// Tell the owner the bot left or was removed from a group.
    pub async fn notify_owner_removed(&self, chat_id: ChatId, title: &str, at: DateTime<Utc>) {
        let text = templates::owner_agent_removed(title, chat_id, at);
        self.notify_owner(&text, None).await;
    }

    async fn notify_owner(&self, text: &str, menu: Option<&ActionMenu>) {
        let Some(owner) = self.owner else {
            return;
        };
        match self
            .transport
            .send_text(owner, text, TextFormat::Html, menu)
            .await
        {
            Ok(_) => info!(owner, "owner notified"),
            Err(e) => warn!(owner, error = %e, "failed to notify owner"),
        }
    }
}
