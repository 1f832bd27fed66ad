//! Error types for racepulse.
//!
//! This module defines all error types used throughout the racepulse crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for racepulse operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the settings database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Remote API Errors ===
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("API error: {status} from {url}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response parsed but did not have the expected shape.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    // === Settings Errors ===
    /// A settings value was rejected.
    #[error("invalid setting '{key}': {message}")]
    InvalidSetting {
        /// The settings key.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    // === Lookup Errors ===
    /// No series with the given slug exists in the built-in dataset.
    #[error("unknown series: {0}")]
    UnknownSeries(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for racepulse operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new unexpected payload error.
    #[must_use]
    pub fn unexpected_payload(message: impl Into<String>) -> Self {
        Self::UnexpectedPayload(message.into())
    }

    /// Create an invalid setting error.
    #[must_use]
    pub fn invalid_setting(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from a remote call (transport or status).
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Check if this error is a non-success HTTP status.
    #[must_use]
    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }
}
