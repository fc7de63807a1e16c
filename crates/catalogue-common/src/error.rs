//! Error types shared by the catalogue crates

use thiserror::Error;

/// Result type alias for common helpers
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised by the shared helpers
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp '{0}': expected epoch milliseconds")]
    InvalidTimestamp(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
