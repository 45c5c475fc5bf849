//! Print the remote diagnostic command.

use hostpulse_core::monitoring::MONITOR_COMMAND;

/// Prints the shell line each poll runs on the remote host
pub fn cmd_command() {
    println!("{MONITOR_COMMAND}");
}
