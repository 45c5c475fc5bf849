//! CLI error types and exit codes.

use hostpulse_core::ConfigError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-connection errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Connection failure - the probed host could not be polled
    pub const CONNECTION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// The probed host ended in an error state or never answered
    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    /// The async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Output could not be produced
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, unknown profile, IO)
    /// - 2: Connection failure (probe ended in error or timed out)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ProbeFailed(_) => exit_codes::CONNECTION_FAILURE,
            Self::Config(_)
            | Self::ProfileNotFound(_)
            | Self::Runtime(_)
            | Self::Output(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
