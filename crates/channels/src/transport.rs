use async_trait::async_trait;

use joinhider_common::types::{ChatId, MessageId};

use crate::{
    Result,
    menu::ActionMenu,
    plan::{MediaSource, MessagePlan, TextFormat},
};

/// Handle to a message the bot has sent, used for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Outbound primitives of the chat platform.
///
/// Implementations only retry when the platform asks them to wait; any other
/// failure is returned and callers decide whether it matters.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> Result<SentMessage>;

    async fn edit_text(
        &self,
        message: SentMessage,
        text: &str,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> Result<()>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;

    async fn send_animation(
        &self,
        chat_id: ChatId,
        media: &MediaSource,
        caption: Option<&str>,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> Result<SentMessage>;

    /// Dismiss the client-side spinner of a callback query.
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;

    /// Send a rendered plan.
    async fn send_plan(&self, chat_id: ChatId, plan: &MessagePlan) -> Result<SentMessage> {
        self.send_text(chat_id, &plan.text, plan.format, plan.menu.as_ref())
            .await
    }

    /// Replace an existing message with a rendered plan.
    async fn edit_plan(&self, message: SentMessage, plan: &MessagePlan) -> Result<()> {
        self.edit_text(message, &plan.text, plan.format, plan.menu.as_ref())
            .await
    }
}
