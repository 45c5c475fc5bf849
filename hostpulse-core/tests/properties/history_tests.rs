//! Property tests for bounded metrics history

use chrono::{Duration, TimeZone, Utc};
use hostpulse_core::monitoring::{MAX_HISTORY, MetricsHistory, MetricsSnapshot};
use proptest::prelude::*;

fn snapshot(seq: usize) -> MetricsSnapshot {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let mut snap = MetricsSnapshot::empty(base + Duration::seconds(seq as i64));
    snap.net_rx_bytes = seq as u64;
    snap
}

proptest! {
    /// Property: history never exceeds its capacity
    #[test]
    fn length_is_bounded(appends in 0usize..200) {
        let mut history = MetricsHistory::new();
        for i in 0..appends {
            history.append(snapshot(i));
            prop_assert!(history.len() <= MAX_HISTORY);
        }
        prop_assert_eq!(history.len(), appends.min(MAX_HISTORY));
    }

    /// Property: entries keep append order and the oldest are dropped first
    #[test]
    fn keeps_most_recent_in_order(appends in 1usize..200) {
        let mut history = MetricsHistory::new();
        for i in 0..appends {
            history.append(snapshot(i));
        }
        let seqs: Vec<u64> = history.iter().map(|s| s.net_rx_bytes).collect();
        let first = appends.saturating_sub(MAX_HISTORY) as u64;
        let expected: Vec<u64> = (first..appends as u64).collect();
        prop_assert_eq!(seqs, expected);
        prop_assert_eq!(history.latest().map(|s| s.net_rx_bytes), Some(appends as u64 - 1));
    }
}
