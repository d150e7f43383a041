//! Common error types for cropwise

use thiserror::Error;

/// Common result type for cropwise operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by configuration loading and the persistence layer
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure (config file, database directory, uploads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bootstrap configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON column could not be encoded or decoded
    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored data violates an expected shape
    #[error("Internal error: {0}")]
    Internal(String),
}
