//! Welcome animation acquisition: reuse a cached file, download it, or
//! generate a placeholder.

pub mod asset;
pub mod download;
pub mod error;
pub mod placeholder;

pub use {
    asset::{AssetStatus, prepare_welcome_asset},
    error::{Error, Result},
};
