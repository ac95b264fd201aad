//! Core error types for grove-core.
//!
//! Only configuration errors ever reach a caller of the session controller.
//! Persistence errors are produced by the stats stores but are absorbed by
//! the controller, which logs them and carries on with in-memory stats.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for grove-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stats storage errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A session needs a strictly positive duration.
    #[error("Session duration must be positive, got {minutes} minute(s)")]
    NonPositiveDuration { minutes: i64 },

    /// The duration is locked while a session is running or paused.
    #[error("Cannot change the session duration while a session is active")]
    SessionActive,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Stats storage errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open the backing database
    #[error("Failed to open stats store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    Query(String),

    /// Stored value is not a non-negative integer
    #[error("Corrupt value for '{key}': {value:?}")]
    Corrupt { key: String, value: String },

    /// The store cannot be reached at all
    #[error("Stats store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        PersistenceError::Query(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
