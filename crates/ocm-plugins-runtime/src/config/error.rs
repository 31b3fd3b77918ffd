//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the host's active configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found at the specified path.
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Failed to read the configuration file.
    #[error("failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Invalid configuration value.
    #[error("invalid configuration: {message}")]
    ValidationError {
        /// What failed validation.
        message: String,
    },

    /// Missing required field.
    #[error("missing required configuration field: {field}")]
    MissingField {
        /// The field path, e.g. `global.logLevel`.
        field: String,
    },

    /// A `configEntries` entry's type could not be parsed.
    #[error("invalid config entry type: {0}")]
    InvalidEntryType(String),

    /// Duplicate plugin directory entry.
    #[error("duplicate config entry type: {0}")]
    DuplicateEntryType(String),
}

impl ConfigError {
    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError { message: message.into() }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
