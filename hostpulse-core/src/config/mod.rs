//! Configuration management for `hostpulse`
//!
//! This module provides the `ConfigManager` for loading and saving the
//! configuration file in TOML format.

mod manager;
mod settings;

pub use manager::{CONFIG_FILE_NAME, ConfigManager};
pub use settings::{AppConfig, LoggingSettings};
