//! Create a default configuration file.

use std::path::Path;

use crate::error::CliError;
use crate::util::create_config_manager;

/// Init command handler
pub fn cmd_init(config_path: Option<&Path>) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;
    let path = manager.config_path();

    if manager.init()? {
        println!("Created {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}
