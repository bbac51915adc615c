//! Error types for progress session handling.

use std::path::PathBuf;

use cortex_progress_types::{DecodeError, ValidationError};
use thiserror::Error;

/// Errors raised while applying progress notifications.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Report or Done for an id with no open session.
    #[error("No open progress session with id '{0}'")]
    UnknownSession(String),

    /// Start for an id that already has an open session.
    #[error("Progress session '{0}' is already open")]
    DuplicateStart(String),

    /// Opening another session would exceed the configured limit.
    #[error("Too many open progress sessions (max: {max})")]
    TooManySessions { max: usize },

    /// Payload failed schema validation.
    #[error("Invalid progress payload for '{id}': {source}")]
    Validation {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Envelope could not be decoded into a progress notification.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ProgressError {
    /// Whether the error is a lifecycle misuse rather than a malformed message.
    pub fn is_protocol_misuse(&self) -> bool {
        matches!(
            self,
            ProgressError::UnknownSession(_) | ProgressError::DuplicateStart(_)
        )
    }
}

/// Result type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse progress config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
