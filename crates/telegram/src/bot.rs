use std::{sync::Arc, time::Duration};

use {
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use joinhider_moderation::{AgentIdentity, ModerationService, commands::COMMAND_DESCRIPTIONS};

use crate::{Result, handlers};

/// Long-polling timeout passed to `getUpdates`, in seconds.
const POLL_TIMEOUT_SECS: u32 = 30;

const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Why the polling loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingStopped {
    Cancelled,
    /// Another process is polling with the same token.
    Conflict,
}

/// Bot client with an HTTP timeout longer than the long-polling timeout, so
/// the client doesn't abort a request before Telegram responds.
pub fn build_bot(token: &str) -> Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(45))
        .build()?;
    Ok(Bot::with_client(token, client))
}

/// Verify credentials, clear any webhook and register slash commands.
pub async fn prepare(bot: &Bot) -> Result<AgentIdentity> {
    let me = bot.get_me().await?;

    // Long polling and webhooks are mutually exclusive.
    bot.delete_webhook().send().await?;

    let commands: Vec<_> = COMMAND_DESCRIPTIONS
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect();
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    let agent = AgentIdentity {
        id: me.id.0 as i64,
        username: me.username.clone(),
    };
    info!(bot_id = agent.id, username = ?agent.username, "telegram bot connected (webhook cleared)");
    Ok(agent)
}

pub(crate) fn is_conflict(error: &RequestError) -> bool {
    matches!(error, RequestError::Api(ApiError::TerminatedByOtherGetUpdates))
}

/// Poll for updates and handle them strictly one at a time until `cancel`
/// fires or another instance takes over the token.
pub async fn run_polling(
    bot: Bot,
    service: Arc<ModerationService>,
    cancel: CancellationToken,
) -> PollingStopped {
    info!("starting telegram polling loop");
    let mut offset: i32 = 0;

    loop {
        let request = bot
            .get_updates()
            .offset(offset)
            .timeout(POLL_TIMEOUT_SECS)
            .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("telegram polling stopped");
                return PollingStopped::Cancelled;
            },
            result = request.send() => result,
        };

        match result {
            Ok(updates) => {
                debug!(count = updates.len(), "got telegram updates");
                for update in updates {
                    offset = update.id.as_offset();
                    if let Err(e) = handlers::handle_update(update, &service).await {
                        error!(error = %e, "error handling telegram update");
                    }
                }
            },
            Err(e) if is_conflict(&e) => {
                warn!("telegram polling disabled: another instance is already running with this token");
                return PollingStopped::Conflict;
            },
            Err(e) => {
                warn!(error = %e, "telegram getUpdates failed");
                tokio::select! {
                    () = cancel.cancelled() => return PollingStopped::Cancelled,
                    () = tokio::time::sleep(POLL_BACKOFF) => {},
                }
            },
        }
    }
}
