//! Counter-to-rate derivation for network throughput
//!
//! Samples arrive at irregular intervals (timer jitter, slow polls, skipped
//! ticks), so the rate always divides by the measured elapsed time.

use chrono::{DateTime, Utc};

/// A cumulative counter reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    /// Counter value in bytes
    pub bytes: u64,
    /// When the counter was read
    pub at: DateTime<Utc>,
}

impl CounterSample {
    /// Creates a sample
    #[must_use]
    pub const fn new(bytes: u64, at: DateTime<Utc>) -> Self {
        Self { bytes, at }
    }
}

/// Throughput in KB/s between two readings of a cumulative byte counter.
///
/// Returns 0 without a previous sample, when no time has elapsed, or when the
/// counter went backwards (reboot, interface reset, clock skew).
#[must_use]
pub fn rate_kbps(prev: Option<CounterSample>, curr: CounterSample) -> u64 {
    let Some(prev) = prev else {
        return 0;
    };

    let elapsed_ms = (curr.at - prev.at).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    let elapsed = elapsed_ms as f64 / 1000.0;

    let delta = curr.bytes as f64 - prev.bytes as f64;
    let kbps = (delta / elapsed / 1024.0).round();
    if kbps <= 0.0 { 0 } else { kbps as u64 }
}
