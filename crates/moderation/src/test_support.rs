//! Recording transport shared by unit tests.

use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicI32, Ordering},
    },
};

use async_trait::async_trait;

use {
    joinhider_channels::{
        ActionMenu, ChatTransport, Error as TransportError, MediaSource, Result as TransportResult,
        SentMessage, TextFormat,
    },
    joinhider_common::types::{ChatId, MessageId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Text {
        chat_id: ChatId,
        text: String,
        format: TextFormat,
        menu: Option<ActionMenu>,
    },
    Edit {
        message: SentMessage,
        text: String,
        menu: Option<ActionMenu>,
    },
    Delete {
        chat_id: ChatId,
        message_id: MessageId,
    },
    Animation {
        chat_id: ChatId,
        media: MediaSource,
        caption: Option<String>,
        menu: Option<ActionMenu>,
    },
    Answer {
        callback_id: String,
    },
}

/// Records every outbound call; selected operations can be made to fail.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    failing_chats: Mutex<HashSet<ChatId>>,
    fail_animations: Mutex<bool>,
    fail_html: Mutex<bool>,
    fail_edits: Mutex<bool>,
    fail_deletes: Mutex<bool>,
    next_id: AtomicI32,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to `chat_id` fails.
    pub fn fail_chat(&self, chat_id: ChatId) {
        self.failing_chats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(chat_id);
    }

    pub fn fail_animations(&self) {
        *self.fail_animations.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    pub fn fail_html(&self) {
        *self.fail_html.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    pub fn fail_edits(&self) {
        *self.fail_edits.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    pub fn fail_deletes(&self) {
        *self.fail_deletes.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Texts sent (not edited) to `chat_id`, in order.
    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Text {
                    chat_id: id, text, ..
                } if id == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<(ChatId, MessageId)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete {
                    chat_id,
                    message_id,
                } => Some((chat_id, message_id)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn chat_fails(&self, chat_id: ChatId) -> bool {
        self.failing_chats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&chat_id)
    }

    fn flag(flag: &Mutex<bool>) -> bool {
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sent(&self, chat_id: ChatId) -> SentMessage {
        SentMessage {
            chat_id,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> TransportResult<SentMessage> {
        self.record(Call::Text {
            chat_id,
            text: text.to_string(),
            format,
            menu: menu.cloned(),
        });
        if self.chat_fails(chat_id) {
            return Err(TransportError::rejected("bot was blocked by the user"));
        }
        if format == TextFormat::Html && Self::flag(&self.fail_html) {
            return Err(TransportError::rejected("can't parse entities"));
        }
        Ok(self.sent(chat_id))
    }

    async fn edit_text(
        &self,
        message: SentMessage,
        text: &str,
        _format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> TransportResult<()> {
        self.record(Call::Edit {
            message,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        if Self::flag(&self.fail_edits) {
            return Err(TransportError::rejected("message can't be edited"));
        }
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> TransportResult<()> {
        self.record(Call::Delete {
            chat_id,
            message_id,
        });
        if Self::flag(&self.fail_deletes) {
            return Err(TransportError::rejected("not enough rights"));
        }
        Ok(())
    }

    async fn send_animation(
        &self,
        chat_id: ChatId,
        media: &MediaSource,
        caption: Option<&str>,
        _format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> TransportResult<SentMessage> {
        self.record(Call::Animation {
            chat_id,
            media: media.clone(),
            caption: caption.map(str::to_string),
            menu: menu.cloned(),
        });
        if self.chat_fails(chat_id) || Self::flag(&self.fail_animations) {
            return Err(TransportError::rejected("wrong file identifier"));
        }
        Ok(self.sent(chat_id))
    }

    async fn answer_callback(&self, callback_id: &str) -> TransportResult<()> {
        self.record(Call::Answer {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }
}
