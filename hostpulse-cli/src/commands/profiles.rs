//! List SSH profiles command.

use std::path::Path;

use hostpulse_core::models::ConnectionProfile;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{format_profiles_json, format_profiles_table};
use crate::util::load_config;

/// List profiles command handler
pub fn cmd_profiles(config_path: Option<&Path>, format: OutputFormat) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let catalog = config.catalog();
    let profiles: Vec<&ConnectionProfile> = catalog.profiles().iter().collect();

    match format {
        OutputFormat::Table => println!("{}", format_profiles_table(&profiles)),
        OutputFormat::Json => println!("{}", format_profiles_json(&profiles)?),
    }

    Ok(())
}
