//! Shared utility functions used across command modules.

use std::path::Path;

use hostpulse_core::config::{AppConfig, ConfigManager};
use hostpulse_core::models::{ConnectionProfile, ProfileCatalog};

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads `config.toml` from the selected directory
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, CliError> {
    create_config_manager(config_path)?
        .load()
        .map_err(|e| CliError::Config(format!("Failed to load configuration: {e}")))
}

/// Creates the multi-threaded runtime that drives the monitor
pub fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Runtime(format!("Failed to create async runtime: {e}")))
}

/// Picks profiles by name, or every profile when `names` is empty.
///
/// Names are matched exactly first, then case-insensitively. Repeated names
/// select the profile once.
pub fn select_profiles<'a>(
    catalog: &'a ProfileCatalog,
    names: &[String],
) -> Result<Vec<&'a ConnectionProfile>, CliError> {
    if names.is_empty() {
        return Ok(catalog.profiles().iter().collect());
    }

    let mut selected: Vec<&ConnectionProfile> = Vec::with_capacity(names.len());
    for name in names {
        let profile = find_profile(catalog, name)?;
        if !selected.iter().any(|p| p.name == profile.name) {
            selected.push(profile);
        }
    }
    Ok(selected)
}

/// Finds one profile by exact or case-insensitive name
pub fn find_profile<'a>(
    catalog: &'a ProfileCatalog,
    name: &str,
) -> Result<&'a ConnectionProfile, CliError> {
    catalog
        .get(name)
        .or_else(|| {
            catalog
                .profiles()
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name))
        })
        .ok_or_else(|| CliError::ProfileNotFound(name.to_string()))
}

/// Starts logging from the `[logging]` section and the verbosity flags.
///
/// A configuration that fails to load is reported later by the command
/// itself, so logging falls back to defaults here.
pub fn init_logging(config_path: Option<&Path>, verbose: u8, quiet: bool) {
    let logging = load_config(config_path)
        .map(|config| config.logging)
        .unwrap_or_default();
    let tracing_config = logging.tracing_config(verbose, quiet);
    if let Err(e) = hostpulse_core::tracing::init_tracing(&tracing_config)
        && !quiet
    {
        eprintln!("Warning: logging disabled: {e}");
    }
}
