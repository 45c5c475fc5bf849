//! Per-target polling loop
//!
//! Each monitored target runs one session task that owns its timer. Every tick
//! (or forced refresh) spawns a poll task guarded by a busy flag, so at most
//! one `ssh` process per target is ever in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

use crate::credentials::{CredentialMaterial, CredentialResolver};
use crate::error::ExecError;
use crate::models::TargetDescriptor;
use crate::tracing::span_names;

use super::collector::snapshot_from_output;
use super::metrics::MonitorTarget;
use super::parser::MONITOR_COMMAND;
use super::registry::Shared;
use super::ssh_exec::{ExecOutcome, ExecRequest, RemoteExecutor, execute};

/// Whether a target currently has a poll in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Ready for the next tick
    #[default]
    Idle,
    /// A poll is running; further ticks are dropped
    Polling,
}

/// Busy flag shared between a session and its poll tasks
#[derive(Debug, Clone, Default)]
pub struct PollGuard {
    busy: Arc<AtomicBool>,
}

impl PollGuard {
    /// Creates an idle guard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> PollState {
        if self.busy.load(Ordering::Acquire) {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    /// Moves `Idle → Polling`.
    ///
    /// Returns `None` if a poll is already running. The guard returns to
    /// `Idle` when the permit is dropped, including on panic.
    #[must_use]
    pub fn try_begin(&self) -> Option<PollPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Proof that the holder owns the single poll slot of a target
#[derive(Debug)]
pub struct PollPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for PollPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Applies the result of one poll to `target`.
///
/// Only a zero exit updates metrics and history; every failure keeps the
/// last good data and sets `Error`.
pub fn apply_outcome(
    target: &mut MonitorTarget,
    result: Result<ExecOutcome, ExecError>,
    captured_at: DateTime<Utc>,
) {
    match result {
        Ok(ExecOutcome::Completed(output)) if output.success() => {
            let snapshot =
                snapshot_from_output(&output.stdout, target.history.latest(), captured_at);
            target.record_success(snapshot);
        }
        Ok(ExecOutcome::Completed(output)) => target.record_error(output.failure_message()),
        Ok(ExecOutcome::TimedOut(after)) => {
            target.record_error(format!("Timed out after {}s", after.as_secs()));
        }
        Err(e) => target.record_error(e.to_string()),
    }
}

/// Everything a session task needs, moved into it at spawn
pub(crate) struct Session {
    pub(crate) id: Uuid,
    pub(crate) descriptor: TargetDescriptor,
    pub(crate) resolver: CredentialResolver,
    pub(crate) executor: Arc<dyn RemoteExecutor>,
    pub(crate) interval: Duration,
    pub(crate) timeout: Duration,
    pub(crate) shared: Weak<Shared>,
}

impl Session {
    /// Resolves credentials, then polls on every tick until stopped.
    ///
    /// Returns the session's key material so the caller can delete its
    /// ephemeral files. A stop during resolution drops the partial material,
    /// which removes whatever files were already written.
    pub(crate) async fn run(
        self,
        mut stop_rx: mpsc::Receiver<()>,
        mut refresh_rx: mpsc::Receiver<()>,
    ) -> CredentialMaterial {
        let name = self.descriptor.name.clone();

        let material = tokio::select! {
            material = self.resolver.resolve(&name, self.descriptor.private_key.as_ref()) => material,
            _ = stop_rx.recv() => {
                tracing::debug!(target_name = %name, "Stopped during credential resolution");
                return CredentialMaterial::default();
            }
        };

        let request = Arc::new(ExecRequest {
            host: self.descriptor.host.clone(),
            port: self.descriptor.port,
            user: self.descriptor.user.clone(),
            key_paths: material.key_paths().into(),
            command: MONITOR_COMMAND.to_string(),
        });
        let guard = PollGuard::new();

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            target_name = %name,
            host = %request.host,
            key_count = request.key_paths.len(),
            interval_secs = self.interval.as_secs(),
            "Monitoring session started"
        );

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                Some(()) = refresh_rx.recv() => {
                    ticker.reset();
                    self.spawn_poll(&guard, &request);
                }
                _ = ticker.tick() => self.spawn_poll(&guard, &request),
            }
        }

        tracing::info!(target_name = %name, "Monitoring session stopped");
        material
    }

    fn spawn_poll(&self, guard: &PollGuard, request: &Arc<ExecRequest>) {
        let Some(permit) = guard.try_begin() else {
            tracing::trace!(target_name = %self.descriptor.name, "Poll still running, skipping tick");
            return;
        };

        let name = self.descriptor.name.clone();
        let session_id = self.id;
        let executor = Arc::clone(&self.executor);
        let request = Arc::clone(request);
        let timeout = self.timeout;
        let shared = Weak::clone(&self.shared);

        let span = tracing::debug_span!(span_names::MONITOR_POLL, target_name = %name);
        tokio::spawn(
            async move {
                let _permit = permit;
                let result = execute(executor.as_ref(), &request, timeout).await;
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "Monitoring poll failed to launch");
                }
                let captured_at = Utc::now();
                if let Some(shared) = shared.upgrade() {
                    shared.apply_poll(&name, session_id, result, captured_at).await;
                }
            }
            .instrument(span),
        );
    }
}
