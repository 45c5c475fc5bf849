//! Data models for remote host metrics
//!
//! Snapshots and targets are plain values: the registry builds a new one for
//! every change and never mutates a published copy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::history::MetricsHistory;

/// Placeholder shown when the uptime could not be determined
pub const UPTIME_PLACEHOLDER: &str = "\u{2014}";

/// One timestamped set of measured metrics for a target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// CPU usage as a percentage (0.0–100.0)
    pub cpu_percent: f64,
    /// Used memory (MB)
    pub mem_used_mb: u64,
    /// Total memory (MB)
    pub mem_total_mb: u64,
    /// Memory usage percentage, 0 when the total is unknown
    pub mem_percent: u8,
    /// Used space on `/`, as reported (e.g. "12G")
    pub disk_used: String,
    /// Size of `/`, as reported (e.g. "50G")
    pub disk_total: String,
    /// Usage of `/` (0–100)
    pub disk_percent: u8,
    /// Received bytes since boot, all non-loopback interfaces
    pub net_rx_bytes: u64,
    /// Transmitted bytes since boot, all non-loopback interfaces
    pub net_tx_bytes: u64,
    /// Receive rate in KB/s
    pub net_rx_rate_kbps: u64,
    /// Transmit rate in KB/s
    pub net_tx_rate_kbps: u64,
    /// Uptime as printed by the host (e.g. "5 days, 3 hours")
    pub uptime: String,
    /// When this snapshot was assembled
    pub captured_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// An all-zero snapshot captured at `captured_at`
    #[must_use]
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            cpu_percent: 0.0,
            mem_used_mb: 0,
            mem_total_mb: 0,
            mem_percent: 0,
            disk_used: "0".to_string(),
            disk_total: "0".to_string(),
            disk_percent: 0,
            net_rx_bytes: 0,
            net_tx_bytes: 0,
            net_rx_rate_kbps: 0,
            net_tx_rate_kbps: 0,
            uptime: UPTIME_PLACEHOLDER.to_string(),
            captured_at,
        }
    }
}

/// Memory usage percentage rounded to the nearest integer
#[must_use]
pub fn memory_percent(used_mb: u64, total_mb: u64) -> u8 {
    if total_mb == 0 {
        return 0;
    }
    let pct = (used_mb as f64 / total_mb as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Connection state of a monitored target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    /// Added, no poll has completed yet
    #[default]
    Connecting,
    /// The last poll succeeded
    Connected,
    /// The last poll failed
    Error,
    /// No longer polled
    Disconnected,
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Error => write!(f, "error"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// One remote host under monitoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorTarget {
    /// Unique name (registry key)
    pub name: String,
    /// Hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Remote user
    pub user: String,
    /// Current status
    pub status: TargetStatus,
    /// Error text, set only while `status` is [`TargetStatus::Error`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Latest snapshot, `None` until the first successful poll
    pub metrics: Option<MetricsSnapshot>,
    /// Recent snapshots, oldest first
    pub history: MetricsHistory,
}

impl MonitorTarget {
    /// Creates a target in the [`TargetStatus::Connecting`] state
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            user: user.into(),
            status: TargetStatus::Connecting,
            error_message: None,
            metrics: None,
            history: MetricsHistory::new(),
        }
    }

    /// Records a successful poll
    pub fn record_success(&mut self, snapshot: MetricsSnapshot) {
        self.history.append(snapshot.clone());
        self.metrics = Some(snapshot);
        self.status = TargetStatus::Connected;
        self.error_message = None;
    }

    /// Records a failed poll; metrics and history are left alone
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.status = TargetStatus::Error;
        self.error_message = Some(message.into());
    }
}
