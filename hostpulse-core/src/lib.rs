//! `hostpulse` Core Library
//!
//! This crate provides the remote host metrics polling engine: it keeps a set
//! of monitored targets, polls each one over `ssh` with a bundled diagnostic
//! command, parses the distro-dependent output and publishes an immutable,
//! bounded-history view of every target to subscribers.
//!
//! # Crate Structure
//!
//! - [`monitoring`] - Parsers, rate calculation, history, `ssh` executor,
//!   polling orchestrator and the target registry
//! - [`credentials`] - Key resolution (vault, inline, file, default keys) and
//!   ephemeral key files
//! - [`models`] - Connection profiles and target descriptors
//! - [`config`] - TOML configuration and settings
//! - [`error`] - Error types
//! - [`tracing`] - Structured logging setup
//! - [`testing`] - In-memory collaborators for tests and dry runs

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod monitoring;
pub mod testing;
pub mod tracing;

pub use config::{AppConfig, ConfigManager, LoggingSettings};
pub use credentials::{
    CredentialMaterial, CredentialResolver, EphemeralKeyFile, NoSecretStore, SecretStore,
    SecretToolStore,
};
pub use error::{ConfigError, ConfigResult, CredentialError, CredentialResult, ExecError};
pub use models::{
    ConnectionProfile, KeyReference, ProfileCatalog, ProfileSource, RawProfile, TargetDescriptor,
};
pub use monitoring::{
    CommandOutput, ExecOutcome, ExecRequest, MAX_HISTORY, MONITOR_COMMAND, MetricsHistory,
    MetricsSnapshot, MonitorRegistry, MonitorSettings, MonitorState, MonitorTarget, PollState,
    RemoteExecutor, SEPARATOR, SshExecutor, TargetStatus,
};
