//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Live CPU, memory, disk and network figures from hosts reachable over SSH
#[derive(Parser)]
#[command(name = "hostpulse")]
#[command(author, version, about = "Remote host monitor over SSH")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "HOSTPULSE_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List SSH profiles from the configuration
    #[command(about = "List SSH profiles that can be monitored")]
    Profiles {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Monitor profiles until interrupted
    #[command(about = "Poll profiles continuously and print every update")]
    Watch {
        /// Profile names (default: all SSH profiles)
        names: Vec<String>,

        /// Polling interval in seconds (1-60)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=60))]
        interval: Option<u8>,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Poll one profile once
    #[command(about = "Poll a profile once and print the result")]
    Probe {
        /// Profile name
        name: String,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Print the diagnostic command run on each host
    #[command(about = "Print the remote diagnostic command line")]
    Command,

    /// Write a default configuration file
    #[command(about = "Create a default configuration file if none exists")]
    Init,
}

/// Output format for listings and monitor updates
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
}
