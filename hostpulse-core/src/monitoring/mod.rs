//! Remote host monitoring
//!
//! Polls each target over `ssh` with one bundled diagnostic command, parses
//! CPU, memory, disk, network and uptime from its output, and keeps a short
//! history per target.
//!
//! The pieces, bottom-up:
//! - [`MetricsParser`] turns raw command output into numbers, never failing
//! - [`rate_kbps`] derives throughput from cumulative counters
//! - [`MetricsHistory`] is the bounded per-target ring of snapshots
//! - [`RemoteExecutor`] / [`SshExecutor`] run the command with a hard timeout
//! - the poller drives one timer per target with an overlap guard
//! - [`MonitorRegistry`] owns all targets and publishes [`MonitorState`]

mod collector;
mod history;
mod metrics;
mod parser;
mod poller;
mod rate;
mod registry;
mod settings;
mod ssh_exec;

pub use collector::{compute_snapshot, snapshot_from_output};
pub use history::{MAX_HISTORY, MetricsHistory};
pub use metrics::{MetricsSnapshot, MonitorTarget, TargetStatus, UPTIME_PLACEHOLDER, memory_percent};
pub use parser::{
    DiskUsage, MONITOR_COMMAND, MemoryUsage, MetricsParser, NetCounters, ParsedMetrics, SEPARATOR,
};
pub use poller::{PollGuard, PollPermit, PollState, apply_outcome};
pub use rate::{CounterSample, rate_kbps};
pub use registry::{MonitorRegistry, MonitorState};
pub use settings::MonitorSettings;
pub use ssh_exec::{
    CommandOutput, DEFAULT_SSH_PORT, ExecOutcome, ExecRequest, RemoteExecutor, SshExecutor,
    execute,
};
