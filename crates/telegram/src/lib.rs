//! Telegram adapter for the join hider.
//!
//! Converts teloxide updates into the moderation core's types, implements
//! [`joinhider_channels::ChatTransport`] on top of the Bot API and runs the
//! long-polling loop that feeds updates to the core one at a time.

pub mod bot;
pub mod convert;
pub mod error;
pub mod handlers;
pub mod outbound;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod mock_api;

pub use {
    bot::{PollingStopped, build_bot, prepare, run_polling},
    error::{Error, Result},
    outbound::TelegramTransport,
};
