//! Common error types for the sales ETL workspace

use thiserror::Error;

/// Common result type for sales ETL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the pipeline, the store and the services
#[derive(Error, Debug)]
pub enum Error {
    /// A record is missing a structurally required field, or a malformed
    /// numeric was seen while the reject policy is active
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A record reached deduplication without a usable OrderId
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// The replace-load transaction could not commit (prior data left intact)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV source could not be read or decoded
    #[error("CSV error: {0}")]
    Csv(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
