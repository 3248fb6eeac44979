//! Process-wide bot settings.
//!
//! Settings come from environment variables (optionally seeded from a `.env`
//! file by the binary) and are read exactly once at startup. The resulting
//! [`BotConfig`] is passed by value or `Arc` into every component; nothing in
//! the core reads the environment on its own.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    schema::BotConfig,
    validate::{Diagnostic, Severity},
};
