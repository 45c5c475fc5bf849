//! Loading and saving `config.toml`

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

use super::settings::AppConfig;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Owns the location of the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses `<config dir>/hostpulse` (e.g. `~/.config/hostpulse`)
    ///
    /// # Errors
    /// Returns `ConfigError::NotFound` if the platform has no config directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NotFound)?;
        Ok(Self::with_config_dir(base.join("hostpulse")))
    }

    /// Uses an explicit directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Directory holding the configuration file
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of `config.toml`
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads the configuration; a missing file yields defaults
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let path = self.config_path();
        let _span = tracing::debug_span!(span_names::CONFIG_LOAD, path = %path.display()).entered();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration file, using defaults");
                return Ok(AppConfig::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let config: AppConfig = toml::from_str(&content)?;
        tracing::debug!(profiles = config.profiles.len(), "Configuration loaded");
        Ok(config)
    }

    /// Writes the configuration, creating the directory if needed
    ///
    /// # Errors
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self, config: &AppConfig) -> ConfigResult<()> {
        let path = self.config_path();
        let _span = tracing::debug_span!(span_names::CONFIG_SAVE, path = %path.display()).entered();

        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;
        let content = toml::to_string_pretty(config)?;
        fs::write(&path, content).map_err(|source| ConfigError::Io { path, source })?;
        tracing::info!("Configuration saved");
        Ok(())
    }

    /// Writes a default configuration unless one exists.
    ///
    /// Returns `true` if a file was created.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn init(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            return Ok(false);
        }
        self.save(&AppConfig::default())?;
        Ok(true)
    }
}
