use std::{future::Future, time::Duration};

use {
    async_trait::async_trait,
    teloxide::{
        ApiError, RequestError,
        payloads::{EditMessageTextSetters, SendAnimationSetters, SendMessageSetters},
        prelude::*,
        types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode},
    },
    tracing::warn,
};

use {
    joinhider_channels::{
        ActionMenu, ButtonAction, ChatTransport, Error as TransportError, MediaSource,
        Result as TransportResult, SentMessage, TextFormat,
    },
    joinhider_common::types,
};

const TELEGRAM_RETRY_AFTER_MAX_RETRIES: usize = 4;

/// [`ChatTransport`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn parse_mode(format: TextFormat) -> Option<ParseMode> {
    match format {
        TextFormat::Html => Some(ParseMode::Html),
        TextFormat::Plain => None,
    }
}

/// Render a menu as an inline keyboard.
pub fn inline_keyboard(menu: &ActionMenu) -> TransportResult<InlineKeyboardMarkup> {
    let mut rows = Vec::with_capacity(menu.rows.len());
    for row in &menu.rows {
        let mut buttons = Vec::with_capacity(row.len());
        for button in row {
            buttons.push(match &button.action {
                ButtonAction::Callback(token) => {
                    InlineKeyboardButton::callback(button.label.clone(), token.clone())
                },
                ButtonAction::Url(url) => {
                    let url = reqwest::Url::parse(url).map_err(|e| {
                        TransportError::invalid_input(format!("bad button url {url}: {e}"))
                    })?;
                    InlineKeyboardButton::url(button.label.clone(), url)
                },
            });
        }
        rows.push(buttons);
    }
    Ok(InlineKeyboardMarkup::new(rows))
}

fn keyboard(menu: Option<&ActionMenu>) -> TransportResult<Option<InlineKeyboardMarkup>> {
    menu.map(inline_keyboard).transpose()
}

fn transport_error(operation: &'static str, error: RequestError) -> TransportError {
    match error {
        RequestError::Api(api) => TransportError::rejected(api),
        other => TransportError::external(operation, other),
    }
}

fn retry_after_duration(error: &RequestError) -> Option<Duration> {
    match error {
        RequestError::RetryAfter(wait) => Some(wait.duration()),
        _ => None,
    }
}

fn is_message_not_modified_error(error: &RequestError) -> bool {
    matches!(error, RequestError::Api(ApiError::MessageNotModified))
}

/// Run `request`, waiting out flood-control responses a bounded number of
/// times.
async fn run_with_retry<T, F, Fut>(
    chat_id: types::ChatId,
    operation: &'static str,
    mut request: F,
) -> Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    let mut retries = 0usize;

    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let Some(wait) = retry_after_duration(&err) else {
                    return Err(err);
                };

                if retries >= TELEGRAM_RETRY_AFTER_MAX_RETRIES {
                    warn!(
                        chat_id,
                        operation,
                        retries,
                        retry_after_secs = wait.as_secs(),
                        "telegram rate limit persisted after retries"
                    );
                    return Err(err);
                }

                retries += 1;
                warn!(
                    chat_id,
                    operation,
                    retries,
                    retry_after_secs = wait.as_secs(),
                    "telegram rate limited, waiting before retry"
                );
                tokio::time::sleep(wait).await;
            },
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: types::ChatId,
        text: &str,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> TransportResult<SentMessage> {
        let markup = keyboard(menu)?;
        let message = run_with_retry(chat_id, "send message", || {
            let mut req = self.bot.send_message(ChatId(chat_id), text);
            if let Some(mode) = parse_mode(format) {
                req = req.parse_mode(mode);
            }
            if let Some(markup) = &markup {
                req = req.reply_markup(markup.clone());
            }
            async move { req.await }
        })
        .await
        .map_err(|e| transport_error("send message", e))?;

        Ok(SentMessage {
            chat_id,
            message_id: message.id.0,
        })
    }

    async fn edit_text(
        &self,
        message: SentMessage,
        text: &str,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> TransportResult<()> {
        let markup = keyboard(menu)?;
        let result = run_with_retry(message.chat_id, "edit message", || {
            let mut req = self.bot.edit_message_text(
                ChatId(message.chat_id),
                MessageId(message.message_id),
                text,
            );
            if let Some(mode) = parse_mode(format) {
                req = req.parse_mode(mode);
            }
            if let Some(markup) = &markup {
                req = req.reply_markup(markup.clone());
            }
            async move { req.await }
        })
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_message_not_modified_error(&e) => Ok(()),
            Err(e) => Err(transport_error("edit message", e)),
        }
    }

    async fn delete_message(
        &self,
        chat_id: types::ChatId,
        message_id: types::MessageId,
    ) -> TransportResult<()> {
        run_with_retry(chat_id, "delete message", || {
            let req = self
                .bot
                .delete_message(ChatId(chat_id), MessageId(message_id));
            async move { req.await }
        })
        .await
        .map_err(|e| transport_error("delete message", e))?;
        Ok(())
    }

    async fn send_animation(
        &self,
        chat_id: types::ChatId,
        media: &MediaSource,
        caption: Option<&str>,
        format: TextFormat,
        menu: Option<&ActionMenu>,
    ) -> TransportResult<SentMessage> {
        let markup = keyboard(menu)?;
        let file = match media {
            MediaSource::Local(path) => InputFile::file(path.clone()),
            MediaSource::Remote(url) => InputFile::url(reqwest::Url::parse(url).map_err(|e| {
                TransportError::invalid_input(format!("bad animation url {url}: {e}"))
            })?),
        };

        let message = run_with_retry(chat_id, "send animation", || {
            let mut req = self.bot.send_animation(ChatId(chat_id), file.clone());
            if let Some(caption) = caption {
                req = req.caption(caption);
                if let Some(mode) = parse_mode(format) {
                    req = req.parse_mode(mode);
                }
            }
            if let Some(markup) = &markup {
                req = req.reply_markup(markup.clone());
            }
            async move { req.await }
        })
        .await
        .map_err(|e| transport_error("send animation", e))?;

        Ok(SentMessage {
            chat_id,
            message_id: message.id.0,
        })
    }

    async fn answer_callback(&self, callback_id: &str) -> TransportResult<()> {
        self.bot
            .answer_callback_query(callback_id)
            .await
            .map_err(|e| transport_error("answer callback", e))?;
        Ok(())
    }
}
