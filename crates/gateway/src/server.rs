use std::net::SocketAddr;

use {
    axum::{Router, routing::get},
    tokio::net::TcpListener,
    tokio_util::sync::CancellationToken,
    tracing::info,
};

/// Liveness router: `/` and `/health` answer as long as the process runs.
pub fn build_health_app() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

/// Bind the liveness endpoint; returns the bound address and the listener.
pub async fn bind_health(bind: &str, port: u16) -> anyhow::Result<(SocketAddr, TcpListener)> {
    let listener = TcpListener::bind((bind, port)).await?;
    let addr = listener.local_addr()?;
    Ok((addr, listener))
}

/// Serve the liveness endpoint until `cancel` fires.
pub async fn serve_health(listener: TcpListener, cancel: CancellationToken) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "liveness endpoint listening");
    }
    axum::serve(listener, build_health_app())
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn root_handler() -> &'static str {
    "🤖 Join Hider Bot is running!"
}

async fn health_handler() -> &'static str {
    "OK"
}
