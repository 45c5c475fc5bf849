//! Bounded per-target snapshot history

use std::collections::VecDeque;

use serde::Serialize;

use super::metrics::MetricsSnapshot;

/// Maximum number of snapshots kept per target
pub const MAX_HISTORY: usize = 30;

/// Chronological ring of recent snapshots (oldest first)
///
/// Used both as the previous sample for rate derivation and for trend
/// rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricsHistory {
    entries: VecDeque<MetricsSnapshot>,
}

impl MetricsHistory {
    /// Creates an empty history
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY + 1),
        }
    }

    /// Appends to the tail and evicts from the head past [`MAX_HISTORY`]
    pub fn append(&mut self, snapshot: MetricsSnapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > MAX_HISTORY {
            self.entries.pop_front();
        }
    }

    /// Most recent snapshot
    #[must_use]
    pub fn latest(&self) -> Option<&MetricsSnapshot> {
        self.entries.back()
    }

    /// Number of stored snapshots
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no snapshot has been stored yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MetricsSnapshot> + ExactSizeIterator {
        self.entries.iter()
    }

    /// CPU percentages oldest to newest, for sparklines
    #[must_use]
    pub fn cpu_series(&self) -> Vec<f64> {
        self.entries.iter().map(|s| s.cpu_percent).collect()
    }
}
