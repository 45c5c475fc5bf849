//! Error types for `hostpulse`
//!
//! Each concern has its own `thiserror` enum. Errors raised while polling a
//! target never reach these types: the orchestrator turns them into target
//! status instead.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written
    #[error("Configuration I/O error at {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value failed boundary validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No configuration directory could be determined
    #[error("Configuration directory not found")]
    NotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors from the secret store and key materialization
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The secret store backend is not installed or not configured
    #[error("Secret backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The locator does not name a stored secret
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The locator is not of the form `vault://<key>`
    #[error("Invalid secret locator: {0}")]
    InvalidLocator(String),

    /// Writing or removing a key file failed
    #[error("Key file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for credential operations
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Errors launching the remote shell client
#[derive(Debug, Error)]
pub enum ExecError {
    /// The client binary could not be spawned or waited on
    #[error("Failed to launch {program}: {source}")]
    Launch {
        /// Program that was being launched
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
