//! Entry points for inbound updates.
//!
//! [`ModerationService`] owns every core component and exposes one method
//! per update kind. Updates are expected one at a time; nothing here spawns.

use std::sync::Arc;

use {
    chrono::Utc,
    tracing::{debug, info, warn},
};

use {
    joinhider_channels::{ChatTransport, MessagePlan, SentMessage},
    joinhider_common::types::{ChatRef, MessageId, UserId, UserRef},
    joinhider_config::BotConfig,
    joinhider_registry::{AuditLog, MembershipRegistry, TargetClass},
};

use crate::{
    Result,
    auth::AuthorizationGate,
    broadcast::{BroadcastEngine, BroadcastPacing},
    commands::Command,
    dispatcher::{NotificationDispatcher, WelcomeContext, WelcomeMedia},
    events::{MembershipEvent, MembershipNotice, classify},
    menus,
    templates::{self, Branding, StatsSnapshot},
    views::{View, ViewToken, transition},
};

/// The bot's own account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub id: UserId,
    pub username: Option<String>,
}

/// A parsed command together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub chat: ChatRef,
    /// `None` for anonymous admins and channel posts.
    pub sender: Option<UserRef>,
    pub message_id: MessageId,
}

/// A pressed inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub id: String,
    pub data: String,
    pub from: UserRef,
    pub chat: Option<ChatRef>,
    /// Message carrying the menu, when still accessible.
    pub message: Option<SentMessage>,
}

pub struct ModerationService {
    agent: AgentIdentity,
    gate: AuthorizationGate,
    registry: Arc<dyn MembershipRegistry>,
    audit: Arc<dyn AuditLog>,
    transport: Arc<dyn ChatTransport>,
    dispatcher: NotificationDispatcher,
    engine: BroadcastEngine,
}

impl ModerationService {
    pub fn new(
        config: &BotConfig,
        agent: AgentIdentity,
        registry: Arc<dyn MembershipRegistry>,
        audit: Arc<dyn AuditLog>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let gate = AuthorizationGate::from_config(config);
        let branding = Branding::new(config, agent.username.clone());
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&transport),
            branding.clone(),
            WelcomeMedia::from_config(config),
            gate.owner(),
        );
        let engine = BroadcastEngine::new(
            Arc::clone(&registry),
            Arc::clone(&audit),
            Arc::clone(&transport),
            gate,
            branding,
        );
        Self {
            agent,
            gate,
            registry,
            audit,
            transport,
            dispatcher,
            engine,
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: BroadcastPacing) -> Self {
        self.engine = self.engine.with_pacing(pacing);
        self
    }

    #[must_use]
    pub fn agent(&self) -> &AgentIdentity {
        &self.agent
    }

    fn branding(&self) -> &Branding {
        self.dispatcher.branding()
    }

    // ── Membership notices ──────────────────────────────────────────────────

    pub async fn handle_notice(&self, notice: &MembershipNotice) -> Result<()> {
        let Some(event) = classify(notice, self.agent.id) else {
            return Ok(());
        };
        let chat = &notice.chat;
        let title = chat.display_title();
        let now = Utc::now();

        match event {
            MembershipEvent::AgentAdded => {
                info!(chat_id = chat.id, title, "bot added to group");
                self.registry
                    .upsert_group_on_add(chat.id, title, now)
                    .await?;
                let ctx = WelcomeContext::Group {
                    title: title.to_string(),
                };
                if !self.dispatcher.deliver_welcome(chat.id, &ctx).await {
                    warn!(chat_id = chat.id, "group welcome undeliverable");
                }
                self.dispatcher
                    .notify_owner_added(chat.id, title, now)
                    .await;
            },
            MembershipEvent::MemberJoined { members } => {
                self.hide_notice(chat, notice.message_id, "join").await;
                debug!(chat_id = chat.id, joined = members.len(), "members joined");
                if self
                    .registry
                    .upsert_group_if_absent(chat.id, title, now)
                    .await?
                {
                    info!(chat_id = chat.id, title, "registered group from join notice");
                }
            },
            MembershipEvent::MemberLeft { member } => {
                debug!(chat_id = chat.id, user_id = member.id, "member left");
                self.hide_notice(chat, notice.message_id, "leave").await;
            },
            MembershipEvent::AgentRemoved => {
                info!(chat_id = chat.id, title, "bot removed from group");
                self.dispatcher
                    .notify_owner_removed(chat.id, title, now)
                    .await;
            },
        }
        Ok(())
    }

    async fn hide_notice(&self, chat: &ChatRef, message_id: MessageId, kind: &str) {
        match self.transport.delete_message(chat.id, message_id).await {
            Ok(()) => info!(chat_id = chat.id, kind, "membership notice hidden"),
            Err(e) => warn!(chat_id = chat.id, kind, error = %e, "failed to hide membership notice"),
        }
    }

    // ── Commands ────────────────────────────────────────────────────────────

    pub async fn handle_command(&self, req: &CommandRequest, command: Command) -> Result<()> {
        let chat = &req.chat;
        let caller = req.sender.as_ref().map_or(0, |u| u.id);
        debug!(chat_id = chat.id, caller, ?command, "command");

        match command {
            Command::Start => {
                if chat.kind.is_private()
                    && let Some(user) = &req.sender
                {
                    self.registry
                        .upsert_user_if_absent(
                            user.id,
                            user.username.as_deref(),
                            &user.first_name,
                            Utc::now(),
                        )
                        .await?;
                }
                let ctx = self.welcome_context(chat, req.sender.as_ref());
                if !self.dispatcher.deliver_welcome(chat.id, &ctx).await {
                    warn!(chat_id = chat.id, "welcome undeliverable");
                }
            },
            Command::Stats => {
                let plan = if self.gate.authorize(caller) {
                    let stats = self.stats().await?;
                    MessagePlan::html(templates::stats_command(self.branding(), stats))
                } else {
                    MessagePlan::plain(templates::stats_rejected(self.branding()))
                };
                self.send(chat, &plan).await;
            },
            Command::Broadcast(_) | Command::GroupBroadcast(_) => {
                if let Some((target, text)) = command.broadcast() {
                    self.engine.broadcast(caller, chat.id, text, target).await?;
                }
            },
            Command::Settings => {
                let plan = if chat.kind.is_group() {
                    MessagePlan::html(templates::settings_command(
                        self.branding(),
                        chat.display_title(),
                        chat.id,
                    ))
                    .with_menu(menus::minimal(self.branding()))
                } else {
                    MessagePlan::html(templates::settings_private_hint(self.branding()))
                };
                self.send(chat, &plan).await;
            },
        }
        Ok(())
    }

    fn welcome_context(&self, chat: &ChatRef, sender: Option<&UserRef>) -> WelcomeContext {
        if !chat.kind.is_private() {
            return WelcomeContext::Group {
                title: chat.display_title().to_string(),
            };
        }
        match sender {
            Some(user) => WelcomeContext::User {
                first_name: user.first_name.clone(),
                is_owner: self.gate.authorize(user.id),
            },
            None => WelcomeContext::Anonymous,
        }
    }

    async fn stats(&self) -> Result<StatsSnapshot> {
        Ok(StatsSnapshot {
            groups: self.registry.count_groups().await?,
            users: self.registry.count_users().await?,
            group_broadcasts: self.audit.count_by_target(TargetClass::Groups).await?,
            user_broadcasts: self.audit.count_by_target(TargetClass::Users).await?,
        })
    }

    async fn send(&self, chat: &ChatRef, plan: &MessagePlan) {
        if let Err(e) = self.transport.send_plan(chat.id, plan).await {
            warn!(chat_id = chat.id, error = %e, "failed to reply");
        }
    }

    // ── Menu callbacks ──────────────────────────────────────────────────────

    pub async fn handle_callback(&self, req: &CallbackRequest) -> Result<()> {
        if let Err(e) = self.transport.answer_callback(&req.id).await {
            debug!(error = %e, "failed to answer callback");
        }

        let token = match req.data.parse::<ViewToken>() {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "ignoring callback");
                return Ok(());
            },
        };
        let Some(chat) = &req.chat else {
            return Ok(());
        };

        // Menus carry no state, so every press starts from the welcome screen.
        let view = transition(View::Welcome, token);

        if view.requires_owner() && !self.gate.authorize(req.from.id) {
            warn!(user_id = req.from.id, ?view, "unauthorized menu access");
            self.send(chat, &MessagePlan::plain(templates::view_rejected(view)))
                .await;
            return Ok(());
        }
        if view.requires_group() && !chat.kind.is_group() {
            return Ok(());
        }

        let b = self.branding();
        let back = menus::sub_view(b);
        let plan = match view {
            View::Welcome => {
                let ctx = self.welcome_context(chat, Some(&req.from));
                self.dispatcher.deliver_welcome(chat.id, &ctx).await;
                if let Some(old) = req.message
                    && let Err(e) = self
                        .transport
                        .delete_message(old.chat_id, old.message_id)
                        .await
                {
                    debug!(chat_id = old.chat_id, error = %e, "failed to delete menu message");
                }
                return Ok(());
            },
            View::Stats => MessagePlan::html(templates::stats_view(
                b,
                self.stats().await?,
                self.gate.owner().unwrap_or_default(),
            ))
            .with_menu(back),
            View::Chats => {
                let groups = self.registry.list_groups().await?;
                MessagePlan::html(templates::chats_view(&groups)).with_menu(back)
            },
            View::GroupSettings => {
                MessagePlan::html(templates::group_settings_view(b, chat.display_title()))
                    .with_menu(back)
            },
            View::BroadcastMenu => {
                MessagePlan::html(templates::broadcast_menu_view(b, TargetClass::Users))
            },
            View::GroupBroadcastMenu => {
                MessagePlan::html(templates::broadcast_menu_view(b, TargetClass::Groups))
            },
            View::Help => MessagePlan::html(templates::help_view(b)).with_menu(back),
        };
        self.show(req.message, chat, &plan).await;
        Ok(())
    }

    /// Replace the menu message in place; animations cannot be edited into
    /// text, so fall back to a fresh message.
    async fn show(&self, message: Option<SentMessage>, chat: &ChatRef, plan: &MessagePlan) {
        if let Some(sent) = message {
            match self.transport.edit_plan(sent, plan).await {
                Ok(()) => return,
                Err(e) => debug!(chat_id = chat.id, error = %e, "edit failed, sending new message"),
            }
        }
        self.send(chat, plan).await;
    }
}
