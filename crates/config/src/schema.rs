use std::path::PathBuf;

use secrecy::{ExposeSecret, Secret};

use joinhider_common::types::UserId;

pub const DEFAULT_SUPPORT_CHANNEL: &str = "@idxhelp";
pub const DEFAULT_ANIMATION_URL: &str = "https://files.catbox.moe/zvv7fa.gif";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:bot_data.db?mode=rwc";
pub const DEFAULT_WELCOME_ASSET: &str = "welcome.gif";
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Immutable settings shared by every component.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,

    /// Privileged operator; `0` means unset and disables owner features.
    pub owner_id: UserId,

    /// Support channel handle, including the leading `@`.
    pub support_channel: String,

    /// Remote welcome animation. `None` when explicitly configured empty.
    pub animation_url: Option<String>,

    /// sqlx connection string for the registry database.
    pub database_url: String,

    /// Local cache path for the welcome animation.
    pub welcome_asset: PathBuf,

    /// Liveness endpoint bind address.
    pub bind: String,

    /// Liveness endpoint port.
    pub port: u16,
}

impl BotConfig {
    /// Config with the given token and every other setting at its default.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            owner_id: 0,
            support_channel: DEFAULT_SUPPORT_CHANNEL.to_string(),
            animation_url: Some(DEFAULT_ANIMATION_URL.to_string()),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            welcome_asset: PathBuf::from(DEFAULT_WELCOME_ASSET),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }

    #[must_use]
    pub fn owner_configured(&self) -> bool {
        self.owner_id != 0
    }

    /// `https://t.me/<handle>` link for the support channel.
    #[must_use]
    pub fn support_url(&self) -> String {
        format!(
            "https://t.me/{}",
            self.support_channel.trim_start_matches('@')
        )
    }

    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"[REDACTED]")
            .field("owner_id", &self.owner_id)
            .field("support_channel", &self.support_channel)
            .field("animation_url", &self.animation_url)
            .field("database_url", &self.database_url)
            .field("welcome_asset", &self.welcome_asset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = BotConfig::with_token("123:ABC");
        assert_eq!(cfg.owner_id, 0);
        assert!(!cfg.owner_configured());
        assert_eq!(cfg.support_channel, "@idxhelp");
        assert_eq!(cfg.animation_url.as_deref(), Some(DEFAULT_ANIMATION_URL));
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn support_url_strips_at_sign() {
        let mut cfg = BotConfig::with_token("t");
        cfg.support_channel = "@mychannel".into();
        assert_eq!(cfg.support_url(), "https://t.me/mychannel");
        cfg.support_channel = "bare".into();
        assert_eq!(cfg.support_url(), "https://t.me/bare");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = BotConfig::with_token("123:SECRET");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
