use std::sync::Arc;

use {
    tokio_util::sync::CancellationToken,
    tracing::{error, info, warn},
};

use {
    joinhider_config::BotConfig,
    joinhider_media::prepare_welcome_asset,
    joinhider_moderation::ModerationService,
    joinhider_registry::store_sqlite::SqliteStore,
    joinhider_telegram::{PollingStopped, TelegramTransport},
};

use crate::server;

/// Run the bot until Ctrl-C or until another instance takes over the token.
///
/// Order: config diagnostics, welcome asset, database, liveness endpoint,
/// Telegram handshake, polling. Only a database or handshake failure is
/// fatal.
pub async fn start_bot(config: BotConfig) -> anyhow::Result<()> {
    config.log_diagnostics();

    let asset = prepare_welcome_asset(&config.welcome_asset, config.animation_url.as_deref()).await;
    info!(?asset, path = %config.welcome_asset.display(), "welcome asset ready");

    let store = Arc::new(SqliteStore::connect(&config.database_url).await?);
    info!(database_url = %config.database_url, "registry database ready");

    let cancel = CancellationToken::new();

    let (addr, listener) = server::bind_health(&config.bind, config.port).await?;
    let health = tokio::spawn(server::serve_health(listener, cancel.clone()));
    info!(%addr, "liveness endpoint started");

    let bot = joinhider_telegram::build_bot(config.token())?;
    let agent = joinhider_telegram::prepare(&bot).await?;

    let service = Arc::new(ModerationService::new(
        &config,
        agent,
        store.clone(),
        store,
        Arc::new(TelegramTransport::new(bot.clone())),
    ));

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            ctrl_c_cancel.cancel();
        }
    });

    match joinhider_telegram::run_polling(bot, service, cancel.clone()).await {
        PollingStopped::Cancelled => info!("bot stopped"),
        PollingStopped::Conflict => {
            warn!("another bot instance is running with this token; shutting down")
        },
    }

    cancel.cancel();
    match health.await {
        Ok(Ok(())) => {},
        Ok(Err(e)) => error!(error = %e, "liveness endpoint failed"),
        Err(e) => error!(error = %e, "liveness task panicked"),
    }
    Ok(())
}
