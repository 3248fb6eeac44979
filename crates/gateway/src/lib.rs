//! Process wiring: liveness endpoint plus the Telegram polling loop.

pub mod server;
pub mod startup;

pub use startup::start_bot;
