use {
    teloxide::types::{CallbackQuery, Message, Update, UpdateKind},
    tracing::debug,
};

use joinhider_moderation::{Command, ModerationService};

use crate::{Result, convert};

/// Route one update to the moderation core.
pub async fn handle_update(update: Update, service: &ModerationService) -> Result<()> {
    match update.kind {
        UpdateKind::Message(msg) => handle_message(msg, service).await,
        UpdateKind::CallbackQuery(query) => handle_callback_query(query, service).await,
        other => {
            debug!("ignoring update: {other:?}");
            Ok(())
        },
    }
}

/// Membership notices first, then slash commands; other messages are ignored.
pub async fn handle_message(msg: Message, service: &ModerationService) -> Result<()> {
    if let Some(notice) = convert::membership_notice(&msg) {
        service.handle_notice(&notice).await?;
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(command) = Command::parse(text, service.agent().username.as_deref()) else {
        return Ok(());
    };
    service
        .handle_command(&convert::command_request(&msg), command)
        .await?;
    Ok(())
}

pub async fn handle_callback_query(query: CallbackQuery, service: &ModerationService) -> Result<()> {
    let Some(request) = convert::callback_request(&query) else {
        debug!(callback_id = %query.id, "callback without data");
        return Ok(());
    };
    service.handle_callback(&request).await?;
    Ok(())
}
