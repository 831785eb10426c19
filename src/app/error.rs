use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum TrawlError {
    /// A single item or a single surface call failed; the run continues.
    #[error("Transient surface error: {0}")]
    AdapterTransient(String),

    /// The collection surface cannot be reached at all.
    #[error("Collection surface unreachable: {0}")]
    AdapterFatal(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Output sink error: {0}")]
    Sink(#[source] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

impl TrawlError {
    /// Whether the collector may log this error and keep going.
    pub fn is_transient(&self) -> bool {
        matches!(self, TrawlError::AdapterTransient(_))
    }
}

pub type Result<T> = std::result::Result<T, TrawlError>;
