//! Shared types, error definitions, and utilities used across all joinhider crates.

pub mod error;
pub mod html;
pub mod types;

pub use error::FromMessage;
