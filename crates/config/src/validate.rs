//! Startup diagnostics for settings that degrade functionality without
//! preventing the bot from running.

use tracing::{info, warn};

use crate::{
    loader::{ENV_ANIMATION_URL, ENV_OWNER_ID},
    schema::BotConfig,
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single configuration diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Environment variable the diagnostic is about.
    pub var: &'static str,
    pub message: String,
}

impl BotConfig {
    /// Reduced-functionality warnings for this configuration.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if !self.owner_configured() {
            out.push(Diagnostic {
                severity: Severity::Warning,
                var: ENV_OWNER_ID,
                message: "OWNER_ID not set, owner features will not work".into(),
            });
        }
        if self.animation_url.is_none() {
            out.push(Diagnostic {
                severity: Severity::Warning,
                var: ENV_ANIMATION_URL,
                message: "ANIMATION_URL is empty, welcome media limited to the local asset".into(),
            });
        }
        out
    }

    /// Emit [`BotConfig::diagnostics`] through `tracing`.
    pub fn log_diagnostics(&self) {
        for diag in self.diagnostics() {
            match diag.severity {
                Severity::Warning => warn!(var = diag.var, "{}", diag.message),
                Severity::Info => info!(var = diag.var, "{}", diag.message),
            }
        }
    }
}
