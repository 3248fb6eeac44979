//! Transport-agnostic outbound messaging.
//!
//! The moderation core renders [`MessagePlan`]s and hands them to a
//! [`ChatTransport`]; the Telegram crate provides the concrete
//! implementation. Keeping the seam here lets the core be tested against a
//! recording transport with no network access.

pub mod error;
pub mod menu;
pub mod plan;
pub mod transport;

pub use {
    error::{Error, Result},
    menu::{ActionMenu, ButtonAction, MenuButton},
    plan::{MediaSource, MessagePlan, TextFormat},
    transport::{ChatTransport, SentMessage},
};
