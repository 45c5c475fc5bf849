//! Command handler modules for the CLI.

mod command;
mod init;
mod probe;
mod profiles;
mod watch;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands, color: bool) -> Result<(), CliError> {
    match command {
        Commands::Profiles { format } => profiles::cmd_profiles(config_path, format),
        Commands::Watch {
            names,
            interval,
            format,
        } => watch::cmd_watch(config_path, &names, interval, format, color),
        Commands::Probe { name, format } => probe::cmd_probe(config_path, &name, format, color),
        Commands::Command => {
            command::cmd_command();
            Ok(())
        }
        Commands::Init => init::cmd_init(config_path),
    }
}
