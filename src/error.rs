//! Error types for Rollcall.
//!
//! Command handlers never return these: group-level failures are reply text.
//! This type covers configuration, logging setup and snapshot storage.

use thiserror::Error;

/// Common error type for Rollcall.
#[derive(Error, Debug)]
pub enum RollcallError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration or input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Snapshot file is inconsistent.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Rollcall operations.
pub type Result<T> = std::result::Result<T, RollcallError>;
