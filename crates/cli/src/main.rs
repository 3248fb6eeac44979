use {
    clap::Parser,
    joinhider_config::BotConfig,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser, Debug)]
#[command(name = "joinhider", about = "Join Hider — hides join/leave messages in Telegram groups")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// sqlx connection string (overrides DATABASE_URL).
    #[arg(long)]
    database_url: Option<String>,

    /// Liveness endpoint bind address (overrides BIND).
    #[arg(long)]
    bind: Option<String>,

    /// Liveness endpoint port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut BotConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(bind) = &self.bind {
            config.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "joinhider starting");

    let mut config = BotConfig::from_env()?;
    cli.apply_overrides(&mut config);

    joinhider_gateway::start_bot(config).await
}
