use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("invalid timestamp {value:?} in {table}: {source}")]
    Timestamp {
        table: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown broadcast target class: {value}")]
    UnknownTarget { value: String },
}

impl Error {
    #[must_use]
    pub fn unknown_target(value: impl Into<String>) -> Self {
        Self::UnknownTarget {
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
