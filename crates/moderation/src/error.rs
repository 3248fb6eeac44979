use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] joinhider_registry::Error),

    #[error(transparent)]
    Transport(#[from] joinhider_channels::Error),

    #[error("unknown menu token: {token}")]
    UnknownToken { token: String },
}

impl Error {
    #[must_use]
    pub fn unknown_token(token: impl Into<String>) -> Self {
        Self::UnknownToken {
            token: token.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
