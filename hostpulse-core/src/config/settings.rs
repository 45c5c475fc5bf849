//! Contents of `config.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::{ProfileCatalog, RawProfile};
use crate::monitoring::MonitorSettings;
use crate::tracing::{TracingConfig, TracingLevel, TracingOutput};

/// Logging section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Base log level, raised by `-v` and lowered by `-q`
    #[serde(default)]
    pub level: TracingLevel,
    /// Append logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Raw `EnvFilter` directive; overrides `level` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl LoggingSettings {
    /// Tracing configuration for these settings
    #[must_use]
    pub fn tracing_config(&self, verbose: u8, quiet: bool) -> TracingConfig {
        let output = self
            .file
            .clone()
            .map_or(TracingOutput::Stderr, TracingOutput::File);
        let config = TracingConfig::new()
            .with_level(self.level.adjusted(verbose, quiet))
            .with_output(output);
        match &self.filter {
            Some(filter) if verbose == 0 && !quiet => config.with_filter(filter.clone()),
            _ => config,
        }
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[monitoring]`
    #[serde(default)]
    pub monitoring: MonitorSettings,
    /// `[logging]`
    #[serde(default)]
    pub logging: LoggingSettings,
    /// `[[profiles]]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<RawProfile>,
}

impl AppConfig {
    /// Validated SSH profiles
    #[must_use]
    pub fn catalog(&self) -> ProfileCatalog {
        ProfileCatalog::from_raw(&self.profiles)
    }
}
