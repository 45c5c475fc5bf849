//! Rendering of profiles and monitor state for the terminal.

use std::fmt::Write as _;

use hostpulse_core::models::ConnectionProfile;
use hostpulse_core::monitoring::{MonitorTarget, TargetStatus, UPTIME_PLACEHOLDER};
use serde::Serialize;

use crate::error::CliError;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";

/// Placeholder for metrics that have not been measured yet
const NO_VALUE: &str = "-";

/// Format profiles as a table string
#[must_use]
pub fn format_profiles_table(profiles: &[&ConnectionProfile]) -> String {
    if profiles.is_empty() {
        return "No SSH profiles configured.".to_string();
    }

    let mut output = String::new();

    let name_width = profiles
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let host_width = profiles
        .iter()
        .map(|p| p.host.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let user_width = profiles
        .iter()
        .map(|p| p.user.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let port_width = 5;

    let _ = writeln!(
        output,
        "{:<name_width$}  {:<host_width$}  {:<port_width$}  {:<user_width$}  KEYS",
        "NAME", "HOST", "PORT", "USER"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<host_width$}  {:-<port_width$}  {:-<user_width$}  ----",
        "", "", "", ""
    );

    for profile in profiles {
        let keys = profile.private_keys.len() + profile.key_paths.len();
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<host_width$}  {:<port_width$}  {:<user_width$}  {keys}",
            profile.name, profile.host, profile.port, profile.user
        );
    }

    output.trim_end().to_string()
}

/// Simplified profile output for JSON
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    /// Profile name
    pub name: String,
    /// Hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Remote user
    pub user: String,
    /// Kind of each key reference (`vault`, `inline`, `path`), never the key itself
    pub keys: Vec<String>,
}

impl From<&ConnectionProfile> for ProfileOutput {
    fn from(profile: &ConnectionProfile) -> Self {
        Self {
            name: profile.name.clone(),
            host: profile.host.clone(),
            port: profile.port,
            user: profile.user.clone(),
            keys: profile
                .private_keys
                .iter()
                .chain(&profile.key_paths)
                .map(|key| key.kind().to_string())
                .collect(),
        }
    }
}

/// Format profiles as JSON string
///
/// # Errors
///
/// Returns `CliError::Output` if JSON serialization fails.
pub fn format_profiles_json(profiles: &[&ConnectionProfile]) -> Result<String, CliError> {
    let output: Vec<ProfileOutput> = profiles.iter().map(|p| (*p).into()).collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))
}

/// Format monitored targets as a table string.
///
/// Error messages are listed below the table, one per failing target.
#[must_use]
pub fn format_targets_table(targets: &[&MonitorTarget], color: bool) -> String {
    if targets.is_empty() {
        return "No targets monitored.".to_string();
    }

    let mut output = String::new();

    let name_width = targets
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let status_width = 12;
    let cpu_width = 6;
    let mem_width = 16;
    let disk_width = 16;
    let rate_width = 10;

    let _ = writeln!(
        output,
        "{:<name_width$}  {:<status_width$}  {:>cpu_width$}  {:<mem_width$}  \
         {:<disk_width$}  {:>rate_width$}  {:>rate_width$}  UPTIME",
        "NAME", "STATUS", "CPU", "MEMORY", "DISK", "RX KB/s", "TX KB/s"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<status_width$}  {:-<cpu_width$}  {:-<mem_width$}  \
         {:-<disk_width$}  {:-<rate_width$}  {:-<rate_width$}  ------",
        "", "", "", "", "", "", ""
    );

    for target in targets {
        let status_text = target.status.to_string();
        let status = paint(
            &format!("{status_text:<status_width$}"),
            status_color(target.status),
            color,
        );
        let (cpu, mem, disk, rx, tx, uptime) = match &target.metrics {
            Some(m) => (
                format!("{:.1}%", m.cpu_percent),
                format!("{}/{} MB {}%", m.mem_used_mb, m.mem_total_mb, m.mem_percent),
                format!("{}/{} {}%", m.disk_used, m.disk_total, m.disk_percent),
                m.net_rx_rate_kbps.to_string(),
                m.net_tx_rate_kbps.to_string(),
                m.uptime.as_str(),
            ),
            None => (
                NO_VALUE.to_string(),
                NO_VALUE.to_string(),
                NO_VALUE.to_string(),
                NO_VALUE.to_string(),
                NO_VALUE.to_string(),
                UPTIME_PLACEHOLDER,
            ),
        };
        let _ = writeln!(
            output,
            "{:<name_width$}  {status}  {cpu:>cpu_width$}  {mem:<mem_width$}  \
             {disk:<disk_width$}  {rx:>rate_width$}  {tx:>rate_width$}  {uptime}",
            target.name
        );
    }

    let errors: Vec<_> = targets
        .iter()
        .filter_map(|t| t.error_message.as_deref().map(|msg| (&t.name, msg)))
        .collect();
    if !errors.is_empty() {
        output.push('\n');
        for (name, message) in errors {
            let _ = writeln!(output, "{}", paint(&format!("{name}: {message}"), RED, color));
        }
    }

    output.trim_end().to_string()
}

/// Single-line CPU history, oldest sample first
#[must_use]
pub fn format_sparkline(series: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    series
        .iter()
        .map(|value| {
            let index = (value.clamp(0.0, 100.0) / 100.0 * 7.0).round() as usize;
            BARS[index.min(BARS.len() - 1)]
        })
        .collect()
}

/// Detailed view of one target, used by `probe`
#[must_use]
pub fn format_target_detail(target: &MonitorTarget, color: bool) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} ({}@{}:{})",
        target.name, target.user, target.host, target.port
    );
    let _ = writeln!(
        output,
        "  Status:  {}",
        paint(&target.status.to_string(), status_color(target.status), color)
    );
    if let Some(message) = &target.error_message {
        let _ = writeln!(output, "  Error:   {message}");
    }
    if let Some(m) = &target.metrics {
        let _ = writeln!(output, "  CPU:     {:.1}%", m.cpu_percent);
        let _ = writeln!(
            output,
            "  Memory:  {} / {} MB ({}%)",
            m.mem_used_mb, m.mem_total_mb, m.mem_percent
        );
        let _ = writeln!(
            output,
            "  Disk:    {} / {} ({}%)",
            m.disk_used, m.disk_total, m.disk_percent
        );
        let _ = writeln!(
            output,
            "  Network: rx {} bytes, tx {} bytes",
            m.net_rx_bytes, m.net_tx_bytes
        );
        let _ = writeln!(output, "  Uptime:  {}", m.uptime);
        if target.history.len() > 1 {
            let _ = writeln!(
                output,
                "  History: {}",
                format_sparkline(&target.history.cpu_series())
            );
        }
        let _ = writeln!(
            output,
            "  {}",
            paint(
                &format!("Captured {}", m.captured_at.format("%Y-%m-%d %H:%M:%S UTC")),
                DIM,
                color
            )
        );
    }
    output.trim_end().to_string()
}

/// Format a value as one compact JSON line
///
/// # Errors
///
/// Returns `CliError::Output` if JSON serialization fails.
pub fn format_json_line<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string(value)
        .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))
}

/// Format a value as pretty-printed JSON
///
/// # Errors
///
/// Returns `CliError::Output` if JSON serialization fails.
pub fn format_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))
}

const fn status_color(status: TargetStatus) -> &'static str {
    match status {
        TargetStatus::Connected => GREEN,
        TargetStatus::Connecting => YELLOW,
        TargetStatus::Error => RED,
        TargetStatus::Disconnected => DIM,
    }
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text.to_string()
    }
}
