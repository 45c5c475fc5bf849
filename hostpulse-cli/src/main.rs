//! `hostpulse` CLI - live metrics from remote hosts over SSH
//!
//! Provides commands for listing SSH profiles, watching hosts continuously,
//! probing a single host once and writing a default configuration.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    util::init_logging(config_path, cli.verbose, cli.quiet);

    let color = !cli.no_color;
    let result = commands::dispatch(config_path, cli.command, color);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
