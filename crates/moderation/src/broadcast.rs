//! One-to-many delivery of an owner-authored message.
//!
//! Sends are strictly sequential with a fixed pause between recipients; the
//! triggering command is not complete until the last recipient has been
//! tried. A failed recipient is logged, counted and skipped.

use std::{sync::Arc, time::Duration};

use {
    chrono::Utc,
    tracing::{error, info, warn},
};

use {
    joinhider_channels::{ChatTransport, SentMessage, TextFormat},
    joinhider_common::{
        html::escape_html,
        types::{ChatId, UserId},
    },
    joinhider_registry::{AuditLog, BroadcastRecord, MembershipRegistry, TargetClass},
};

use crate::{
    Result,
    auth::AuthorizationGate,
    templates::{self, Branding},
};

/// Delay between consecutive sends, per recipient class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastPacing {
    pub groups: Duration,
    pub users: Duration,
}

impl Default for BroadcastPacing {
    fn default() -> Self {
        Self {
            groups: Duration::from_millis(500),
            users: Duration::from_millis(300),
        }
    }
}

impl BroadcastPacing {
    #[must_use]
    pub fn for_target(&self, target: TargetClass) -> Duration {
        match target {
            TargetClass::Groups => self.groups,
            TargetClass::Users => self.users,
        }
    }
}

/// Result of a completed run. `succeeded + failed == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub target: TargetClass,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub record: BroadcastRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Caller is not the owner; nothing was read or written.
    Unauthorized,
    /// No message text; a usage hint was sent.
    EmptyMessage,
    /// The recipient set was empty; no audit record was written.
    NoRecipients,
    Completed(BroadcastSummary),
}

pub struct BroadcastEngine {
    registry: Arc<dyn MembershipRegistry>,
    audit: Arc<dyn AuditLog>,
    transport: Arc<dyn ChatTransport>,
    gate: AuthorizationGate,
    branding: Branding,
    pacing: BroadcastPacing,
}

impl BroadcastEngine {
    pub fn new(
        registry: Arc<dyn MembershipRegistry>,
        audit: Arc<dyn AuditLog>,
        transport: Arc<dyn ChatTransport>,
        gate: AuthorizationGate,
        branding: Branding,
    ) -> Self {
        Self {
            registry,
            audit,
            transport,
            gate,
            branding,
            pacing: BroadcastPacing::default(),
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: BroadcastPacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Send `message` to every recipient of `target` on behalf of `caller`.
    ///
    /// Progress, rejections and the final summary go to `reply_chat`. Only
    /// registry and audit-log failures are returned as errors.
    pub async fn broadcast(
        &self,
        caller: UserId,
        reply_chat: ChatId,
        message: &str,
        target: TargetClass,
    ) -> Result<BroadcastOutcome> {
        if !self.gate.authorize(caller) {
            warn!(caller, %target, "unauthorized broadcast attempt");
            self.reply(
                reply_chat,
                &templates::command_rejected(&self.branding),
                TextFormat::Plain,
            )
            .await;
            return Ok(BroadcastOutcome::Unauthorized);
        }

        let message = message.trim();
        if message.is_empty() {
            self.reply(
                reply_chat,
                &templates::broadcast_usage(&self.branding, target),
                TextFormat::Html,
            )
            .await;
            return Ok(BroadcastOutcome::EmptyMessage);
        }

        let recipients = self.recipients(target).await?;
        if recipients.is_empty() {
            self.reply(
                reply_chat,
                templates::broadcast_no_recipients(target),
                TextFormat::Plain,
            )
            .await;
            return Ok(BroadcastOutcome::NoRecipients);
        }

        let total = recipients.len();
        info!(%target, total, "broadcast started");
        let progress = self
            .reply(
                reply_chat,
                &templates::broadcast_progress(target, total),
                TextFormat::Plain,
            )
            .await;

        let body = escape_html(message);
        let pause = self.pacing.for_target(target);
        let (mut succeeded, mut failed) = (0usize, 0usize);
        for (i, chat_id) in recipients.iter().enumerate() {
            match self
                .transport
                .send_text(*chat_id, &body, TextFormat::Html, None)
                .await
            {
                Ok(_) => succeeded += 1,
                Err(e) => {
                    error!(chat_id, %target, error = %e, "broadcast delivery failed");
                    failed += 1;
                },
            }
            if i + 1 < total {
                tokio::time::sleep(pause).await;
            }
        }

        let record = self.audit.append(message, Utc::now(), target).await?;
        info!(%target, total, succeeded, failed, record_id = record.id, "broadcast finished");

        let summary =
            templates::broadcast_summary(&self.branding, target, total, succeeded, failed);
        self.report(progress, reply_chat, &summary).await;

        Ok(BroadcastOutcome::Completed(BroadcastSummary {
            target,
            total,
            succeeded,
            failed,
            record,
        }))
    }

    async fn recipients(&self, target: TargetClass) -> Result<Vec<ChatId>> {
        Ok(match target {
            TargetClass::Groups => self
                .registry
                .list_groups()
                .await?
                .into_iter()
                .map(|g| g.id)
                .collect(),
            TargetClass::Users => self
                .registry
                .list_users()
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect(),
        })
    }

    async fn reply(&self, chat_id: ChatId, text: &str, format: TextFormat) -> Option<SentMessage> {
        match self.transport.send_text(chat_id, text, format, None).await {
            Ok(sent) => Some(sent),
            Err(e) => {
                warn!(chat_id, error = %e, "failed to reply");
                None
            },
        }
    }

    /// Replace the progress message with the summary, or post it fresh.
    async fn report(&self, progress: Option<SentMessage>, chat_id: ChatId, summary: &str) {
        if let Some(sent) = progress {
            match self
                .transport
                .edit_text(sent, summary, TextFormat::Html, None)
                .await
            {
                Ok(()) => return,
                Err(e) => warn!(chat_id, error = %e, "failed to edit progress message"),
            }
        }
        self.reply(chat_id, summary, TextFormat::Html).await;
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        joinhider_config::BotConfig,
        joinhider_registry::{MembershipRegistry, store_memory::InMemoryStore},
    };

    use super::*;

    use crate::test_support::{Call, RecordingTransport};

    const OWNER: UserId = 1;
    const OWNER_CHAT: ChatId = 1;

    struct Harness {
        store: Arc<InMemoryStore>,
        transport: Arc<RecordingTransport>,
        engine: BroadcastEngine,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let engine = BroadcastEngine::new(
            store.clone(),
            store.clone(),
            transport.clone(),
            AuthorizationGate::new(OWNER),
            Branding::new(&BotConfig::with_token("t"), None),
        );
        Harness {
            store,
            transport,
            engine,
        }
    }

    async fn seed_groups(store: &InMemoryStore, ids: &[ChatId]) {
        for (i, id) in ids.iter().enumerate() {
            let at = Utc::now() + chrono::Duration::seconds(i as i64);
            store.upsert_group_on_add(*id, "g", at).await.unwrap();
        }
    }

    fn completed(outcome: BroadcastOutcome) -> BroadcastSummary {
        match outcome {
            BroadcastOutcome::Completed(summary) => summary,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_failing_group_is_counted_and_skipped() {
        let h = harness();
        seed_groups(&h.store, &[-1, -2, -3]).await;
        h.transport.fail_chat(-2);

        let summary = completed(
            h.engine
                .broadcast(OWNER, OWNER_CHAT, "Hello", TargetClass::Groups)
                .await
                .unwrap(),
        );

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        let records = h.store.broadcasts();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Hello");
        assert_eq!(records[0].target_class, TargetClass::Groups);
        for id in [-1, -2, -3] {
            assert_eq!(h.transport.texts_to(id), vec!["Hello".to_string()]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn progress_message_is_edited_into_summary() {
        let h = harness();
        seed_groups(&h.store, &[-1, -2]).await;

        h.engine
            .broadcast(OWNER, OWNER_CHAT, "hi", TargetClass::Groups)
            .await
            .unwrap();

        let to_owner = h.transport.texts_to(OWNER_CHAT);
        assert_eq!(to_owner, vec![
            "🔄 Broadcasting to 2 groups...\nPlease wait...".to_string()
        ]);
        let edits = h.transport.edits();
        assert_eq!(edits.len(), 1);
        assert!(edits[0].contains("<b>Successful:</b> 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_edit_posts_summary_fresh() {
        let h = harness();
        seed_groups(&h.store, &[-1]).await;
        h.transport.fail_edits();

        h.engine
            .broadcast(OWNER, OWNER_CHAT, "hi", TargetClass::Groups)
            .await
            .unwrap();

        let to_owner = h.transport.texts_to(OWNER_CHAT);
        assert_eq!(to_owner.len(), 2);
        assert!(to_owner[1].contains("Broadcast Complete"));
    }

    #[tokio::test]
    async fn non_owner_is_rejected_without_side_effects() {
        let h = harness();
        seed_groups(&h.store, &[-1]).await;

        let outcome = h
            .engine
            .broadcast(99, 99, "x", TargetClass::Users)
            .await
            .unwrap();

        assert_eq!(outcome, BroadcastOutcome::Unauthorized);
        assert!(h.store.broadcasts().is_empty());
        assert_eq!(h.store.count_users().await.unwrap(), 0);
        assert_eq!(h.transport.calls(), vec![Call::Text {
            chat_id: 99,
            text: templates::command_rejected(&Branding::new(&BotConfig::with_token("t"), None)),
            format: TextFormat::Plain,
            menu: None,
        }]);
    }

    #[tokio::test]
    async fn empty_recipient_set_writes_no_record() {
        let h = harness();

        let outcome = h
            .engine
            .broadcast(OWNER, OWNER_CHAT, "hello", TargetClass::Users)
            .await
            .unwrap();

        assert_eq!(outcome, BroadcastOutcome::NoRecipients);
        assert!(h.store.broadcasts().is_empty());
        assert_eq!(h.transport.texts_to(OWNER_CHAT), vec![
            "❌ No users found to broadcast!".to_string()
        ]);
    }

    #[tokio::test]
    async fn blank_message_gets_usage() {
        let h = harness();
        seed_groups(&h.store, &[-1]).await;

        let outcome = h
            .engine
            .broadcast(OWNER, OWNER_CHAT, "   ", TargetClass::Groups)
            .await
            .unwrap();

        assert_eq!(outcome, BroadcastOutcome::EmptyMessage);
        assert!(h.store.broadcasts().is_empty());
        assert!(h.transport.texts_to(OWNER_CHAT)[0].contains("/gbroadcast"));
        assert!(h.transport.texts_to(-1).is_empty());
    }

    #[tokio::test]
    async fn message_is_escaped_but_recorded_verbatim() {
        let h = harness();
        h.store
            .upsert_user_if_absent(5, None, "Ann", Utc::now())
            .await
            .unwrap();

        let summary = completed(
            h.engine
                .broadcast(OWNER, OWNER_CHAT, "<b>x</b> & y", TargetClass::Users)
                .await
                .unwrap(),
        );

        assert_eq!(h.transport.texts_to(5), vec![
            "&lt;b&gt;x&lt;/b&gt; &amp; y".to_string()
        ]);
        assert_eq!(summary.record.message, "<b>x</b> & y");
        assert_eq!(summary.record.target_class, TargetClass::Users);
    }

    #[tokio::test(start_paused = true)]
    async fn sends_are_paced_including_after_failures() {
        let h = harness();
        seed_groups(&h.store, &[-1, -2, -3]).await;
        h.transport.fail_chat(-1);

        let start = tokio::time::Instant::now();
        h.engine
            .broadcast(OWNER, OWNER_CHAT, "hi", TargetClass::Groups)
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn users_use_shorter_pacing() {
        let h = harness();
        for id in [10, 11] {
            h.store
                .upsert_user_if_absent(id, None, "u", Utc::now())
                .await
                .unwrap();
        }

        let start = tokio::time::Instant::now();
        h.engine
            .broadcast(OWNER, OWNER_CHAT, "hi", TargetClass::Users)
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(600), "{elapsed:?}");
    }

    #[tokio::test]
    async fn custom_pacing_applies() {
        let mut h = harness();
        h.engine = h.engine.with_pacing(BroadcastPacing {
            groups: Duration::ZERO,
            users: Duration::ZERO,
        });
        seed_groups(&h.store, &[-1, -2]).await;

        let summary = completed(
            h.engine
                .broadcast(OWNER, OWNER_CHAT, "hi", TargetClass::Groups)
                .await
                .unwrap(),
        );
        assert_eq!(summary.succeeded + summary.failed, summary.total);
    }
}
