use std::path::PathBuf;

use secrecy::Secret;

use crate::{
    error::{Error, Result},
    schema::{
        BotConfig, DEFAULT_ANIMATION_URL, DEFAULT_BIND, DEFAULT_DATABASE_URL, DEFAULT_PORT,
        DEFAULT_SUPPORT_CHANNEL, DEFAULT_WELCOME_ASSET,
    },
};

pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_OWNER_ID: &str = "OWNER_ID";
pub const ENV_SUPPORT_CHANNEL: &str = "SUPPORT_CHANNEL";
pub const ENV_ANIMATION_URL: &str = "ANIMATION_URL";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_WELCOME_ASSET: &str = "WELCOME_ASSET";
pub const ENV_BIND: &str = "BIND";
pub const ENV_PORT: &str = "PORT";

impl BotConfig {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through a custom lookup function.
    ///
    /// This is the implementation behind [`BotConfig::from_env`]; the separate
    /// signature makes it testable without mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_BOT_TOKEN)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingToken)?;

        let owner_id = match lookup(ENV_OWNER_ID).map(|v| v.trim().to_string()) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<i64>()
                .map_err(|e| Error::invalid(ENV_OWNER_ID, raw.clone(), e))?,
            _ => 0,
        };

        let support_channel = lookup(ENV_SUPPORT_CHANNEL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SUPPORT_CHANNEL.to_string());

        // Unset falls back to the hosted default; set-but-empty disables it.
        let animation_url = match lookup(ENV_ANIMATION_URL) {
            None => Some(DEFAULT_ANIMATION_URL.to_string()),
            Some(raw) => {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            },
        };

        let database_url = lookup(ENV_DATABASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let welcome_asset = lookup(ENV_WELCOME_ASSET)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_WELCOME_ASSET), PathBuf::from);

        let bind = lookup(ENV_BIND)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let port = match lookup(ENV_PORT).map(|v| v.trim().to_string()) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<u16>()
                .map_err(|e| Error::invalid(ENV_PORT, raw.clone(), e))?,
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            token: Secret::new(token),
            owner_id,
            support_channel,
            animation_url,
            database_url,
            welcome_asset,
            bind,
            port,
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use {rstest::rstest, secrecy::ExposeSecret};

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BotConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn missing_token_is_fatal() {
        assert!(matches!(load(&[]), Err(Error::MissingToken)));
    }

    #[test]
    fn blank_token_is_fatal() {
        assert!(matches!(
            load(&[(ENV_BOT_TOKEN, "   ")]),
            Err(Error::MissingToken)
        ));
    }

    #[test]
    fn token_only_uses_defaults() {
        let cfg = load(&[(ENV_BOT_TOKEN, "123:ABC")]).unwrap();
        assert_eq!(cfg.token.expose_secret(), "123:ABC");
        assert_eq!(cfg.owner_id, 0);
        assert_eq!(cfg.support_channel, DEFAULT_SUPPORT_CHANNEL);
        assert_eq!(cfg.animation_url.as_deref(), Some(DEFAULT_ANIMATION_URL));
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.welcome_asset, PathBuf::from(DEFAULT_WELCOME_ASSET));
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn explicit_values_win() {
        let cfg = load(&[
            (ENV_BOT_TOKEN, "tok"),
            (ENV_OWNER_ID, " 42 "),
            (ENV_SUPPORT_CHANNEL, "@helpdesk"),
            (ENV_ANIMATION_URL, "https://example.com/a.gif"),
            (ENV_DATABASE_URL, "sqlite::memory:"),
            (ENV_WELCOME_ASSET, "/tmp/w.gif"),
            (ENV_PORT, "9000"),
        ])
        .unwrap();
        assert_eq!(cfg.owner_id, 42);
        assert_eq!(cfg.support_channel, "@helpdesk");
        assert_eq!(
            cfg.animation_url.as_deref(),
            Some("https://example.com/a.gif")
        );
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.welcome_asset, PathBuf::from("/tmp/w.gif"));
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn empty_animation_url_disables_remote_media() {
        let cfg = load(&[(ENV_BOT_TOKEN, "tok"), (ENV_ANIMATION_URL, "")]).unwrap();
        assert_eq!(cfg.animation_url, None);
    }

    #[rstest]
    #[case(ENV_OWNER_ID, "not-a-number")]
    #[case(ENV_PORT, "70000")]
    fn unparseable_numbers_are_rejected(#[case] var: &str, #[case] value: &str) {
        let err = load(&[(ENV_BOT_TOKEN, "tok"), (var, value)]).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }), "{err}");
    }
}
