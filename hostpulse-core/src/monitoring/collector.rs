//! Snapshot assembly
//!
//! Turns the raw output of one [`MONITOR_COMMAND`](super::MONITOR_COMMAND)
//! run into a [`MetricsSnapshot`], deriving network rates against the
//! previous snapshot of the same target.

use chrono::{DateTime, Utc};

use super::metrics::{MetricsSnapshot, memory_percent};
use super::parser::{MetricsParser, ParsedMetrics};
use super::rate::{CounterSample, rate_kbps};

/// Builds a full snapshot from parsed output and the previous snapshot.
///
/// A previous snapshot with a zero receive counter found no interfaces, so it
/// is not used as a rate baseline.
#[must_use]
pub fn compute_snapshot(
    parsed: ParsedMetrics,
    previous: Option<&MetricsSnapshot>,
    captured_at: DateTime<Utc>,
) -> MetricsSnapshot {
    let baseline = previous.filter(|p| p.net_rx_bytes > 0);

    let net_rx_rate_kbps = rate_kbps(
        baseline.map(|p| CounterSample::new(p.net_rx_bytes, p.captured_at)),
        CounterSample::new(parsed.network.rx_bytes, captured_at),
    );
    let net_tx_rate_kbps = rate_kbps(
        baseline.map(|p| CounterSample::new(p.net_tx_bytes, p.captured_at)),
        CounterSample::new(parsed.network.tx_bytes, captured_at),
    );

    MetricsSnapshot {
        cpu_percent: parsed.cpu_percent,
        mem_used_mb: parsed.memory.used_mb,
        mem_total_mb: parsed.memory.total_mb,
        mem_percent: memory_percent(parsed.memory.used_mb, parsed.memory.total_mb),
        disk_used: parsed.disk.used,
        disk_total: parsed.disk.total,
        disk_percent: parsed.disk.percent,
        net_rx_bytes: parsed.network.rx_bytes,
        net_tx_bytes: parsed.network.tx_bytes,
        net_rx_rate_kbps,
        net_tx_rate_kbps,
        uptime: parsed.uptime,
        captured_at,
    }
}

/// Parses raw command output and builds a snapshot in one step
#[must_use]
pub fn snapshot_from_output(
    output: &str,
    previous: Option<&MetricsSnapshot>,
    captured_at: DateTime<Utc>,
) -> MetricsSnapshot {
    compute_snapshot(MetricsParser::parse(output), previous, captured_at)
}
