//! Membership-notice suppression and owner broadcasts.
//!
//! Inbound updates are handled one at a time:
//!
//! - membership notices go through [`events::classify`] and then
//!   [`service::ModerationService::handle_notice`], which updates the registry,
//!   deletes join/leave notices and notifies the owner;
//! - commands and menu callbacks are routed through the
//!   [`auth::AuthorizationGate`] to the [`dispatcher::NotificationDispatcher`]
//!   or the [`broadcast::BroadcastEngine`].
//!
//! Nothing here talks to Telegram directly; all delivery goes through
//! [`joinhider_channels::ChatTransport`].

pub mod auth;
pub mod broadcast;
pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod menus;
pub mod service;
pub mod templates;
pub mod views;

#[cfg(test)]
mod test_support;

pub use {
    auth::AuthorizationGate,
    broadcast::{BroadcastEngine, BroadcastOutcome, BroadcastPacing, BroadcastSummary},
    commands::Command,
    dispatcher::{NotificationDispatcher, WelcomeContext, WelcomeMedia},
    error::{Error, Result},
    events::{MembershipEvent, MembershipNotice, classify},
    service::{AgentIdentity, CallbackRequest, CommandRequest, ModerationService},
    views::{View, ViewToken},
};
