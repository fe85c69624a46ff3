//! Core error types for DriveMeter.
//!
//! Validation is the only failure a caller of the lookup operations ever
//! sees; configuration errors surface at startup, before any lookup runs.

use thiserror::Error;

/// Central error type for DriveMeter operations.
#[derive(Error, Debug)]
pub enum DriveMeterError {
    /// Validation errors (registration number grammar)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found at an explicitly requested path
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A tier is enabled but its credential is empty
    #[error("{field} is required when the paid tier is enabled")]
    MissingCredential {
        /// Field name
        field: String,
    },
}

/// Result type alias using `DriveMeterError`.
pub type Result<T> = std::result::Result<T, DriveMeterError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
