//! Monitored target registry and state publisher
//!
//! [`MonitorRegistry`] is the single writer for all target state. Every
//! mutation publishes a fresh immutable [`MonitorState`] on a watch channel;
//! readers never see a partially updated map.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::credentials::{CredentialMaterial, CredentialResolver, SecretStore, SecretToolStore};
use crate::error::ExecError;
use crate::models::{ProfileSource, TargetDescriptor};
use crate::tracing::span_names;

use super::metrics::MonitorTarget;
use super::poller::{Session, apply_outcome};
use super::settings::MonitorSettings;
use super::ssh_exec::{ExecOutcome, RemoteExecutor, SshExecutor};

/// Immutable view of every monitored target, keyed by name
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MonitorState {
    targets: BTreeMap<String, MonitorTarget>,
}

impl MonitorState {
    /// Target by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MonitorTarget> {
        self.targets.get(name)
    }

    /// Whether a target with this name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Targets in name order
    pub fn iter(&self) -> impl Iterator<Item = &MonitorTarget> {
        self.targets.values()
    }

    /// Target names in order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    /// Number of targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no target is monitored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

struct SessionHandle {
    id: Uuid,
    stop_tx: mpsc::Sender<()>,
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<CredentialMaterial>,
}

#[derive(Default)]
struct Inner {
    targets: BTreeMap<String, MonitorTarget>,
    sessions: HashMap<String, SessionHandle>,
}

pub(crate) struct Shared {
    settings: MonitorSettings,
    executor: Arc<dyn RemoteExecutor>,
    resolver: CredentialResolver,
    inner: Mutex<Inner>,
    publisher: watch::Sender<Arc<MonitorState>>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.publisher.send_replace(Arc::new(MonitorState {
            targets: inner.targets.clone(),
        }));
    }

    /// Stores a poll result unless its session has since been removed
    pub(crate) async fn apply_poll(
        &self,
        name: &str,
        session_id: Uuid,
        result: Result<ExecOutcome, ExecError>,
        captured_at: DateTime<Utc>,
    ) {
        let mut inner = self.inner.lock().await;
        if inner.sessions.get(name).map(|s| s.id) != Some(session_id) {
            tracing::debug!(target_name = %name, "Discarding result of a removed session");
            return;
        }
        let Some(target) = inner.targets.get_mut(name) else {
            return;
        };
        apply_outcome(target, result, captured_at);
        tracing::debug!(target_name = %name, status = %target.status, "Poll completed");
        self.publish(&inner);
    }
}

/// Handle to the set of monitored targets
///
/// Cloning is cheap; all clones share the same targets. When the last clone
/// is dropped every session stops and its ephemeral key files are removed.
#[derive(Clone)]
pub struct MonitorRegistry {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("settings", &self.shared.settings)
            .field("targets", &self.target_names())
            .finish_non_exhaustive()
    }
}

impl MonitorRegistry {
    /// Creates a registry with explicit collaborators
    #[must_use]
    pub fn new(
        settings: MonitorSettings,
        executor: Arc<dyn RemoteExecutor>,
        profiles: Arc<dyn ProfileSource>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        let resolver = CredentialResolver::new(profiles, secrets, &settings);
        let (publisher, _) = watch::channel(Arc::new(MonitorState::default()));
        Self {
            shared: Arc::new(Shared {
                settings,
                executor,
                resolver,
                inner: Mutex::new(Inner::default()),
                publisher,
            }),
        }
    }

    /// Creates a registry that polls with the system `ssh` client and reads
    /// `vault://` keys from the desktop keyring
    #[must_use]
    pub fn with_ssh(settings: MonitorSettings, profiles: Arc<dyn ProfileSource>) -> Self {
        let executor = Arc::new(SshExecutor::from_settings(&settings));
        Self::new(settings, executor, profiles, Arc::new(SecretToolStore::default()))
    }

    /// Monitoring settings in effect
    #[must_use]
    pub fn settings(&self) -> &MonitorSettings {
        &self.shared.settings
    }

    /// Starts monitoring a target.
    ///
    /// The target is published as `Connecting` right away; credentials are
    /// resolved inside the new session before the first poll. Returns `false`
    /// and does nothing if a target with the same name exists.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn add_target(&self, descriptor: TargetDescriptor) -> bool {
        let mut inner = self.shared.inner.lock().await;
        if inner.targets.contains_key(&descriptor.name) {
            tracing::debug!(target_name = %descriptor.name, "Target already monitored");
            return false;
        }

        let name = descriptor.name.clone();
        inner.targets.insert(
            name.clone(),
            MonitorTarget::new(
                name.clone(),
                descriptor.host.clone(),
                descriptor.port,
                descriptor.user.clone(),
            ),
        );

        let (stop_tx, stop_rx) = mpsc::channel(1);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let session = Session {
            id: Uuid::new_v4(),
            descriptor,
            resolver: self.shared.resolver.clone(),
            executor: Arc::clone(&self.shared.executor),
            interval: self.shared.settings.poll_interval(),
            timeout: self.shared.settings.exec_timeout(),
            shared: Arc::downgrade(&self.shared),
        };
        let id = session.id;
        let span = tracing::info_span!(span_names::MONITOR_SESSION, target_name = %name, session_id = %id);
        let task = tokio::spawn(session.run(stop_rx, refresh_rx).instrument(span));

        inner.sessions.insert(
            name.clone(),
            SessionHandle {
                id,
                stop_tx,
                refresh_tx,
                task,
            },
        );
        self.shared.publish(&inner);
        tracing::info!(target_name = %name, "Target added");
        true
    }

    /// Stops monitoring a target and deletes its ephemeral key files.
    ///
    /// A poll still in flight finishes on its own and its result is dropped.
    /// Returns `false` if no such target exists.
    pub async fn remove_target(&self, name: &str) -> bool {
        let handle = {
            let mut inner = self.shared.inner.lock().await;
            let handle = inner.sessions.remove(name);
            let removed = inner.targets.remove(name).is_some();
            if !removed && handle.is_none() {
                return false;
            }
            self.shared.publish(&inner);
            handle
        };

        if let Some(handle) = handle {
            let _ = handle.stop_tx.send(()).await;
            match handle.task.await {
                Ok(material) => material.cleanup(),
                Err(e) => tracing::warn!(target_name = %name, error = %e, "Monitoring session ended abnormally"),
            }
        }
        tracing::info!(target_name = %name, "Target removed");
        true
    }

    /// Removes every target
    pub async fn remove_all(&self) {
        let names = self.target_names();
        futures::future::join_all(names.iter().map(|name| self.remove_target(name))).await;
    }

    /// Resets the target's timer and polls it now, unless a poll is already
    /// running. Returns `false` if no such target exists.
    pub async fn force_refresh(&self, name: &str) -> bool {
        let inner = self.shared.inner.lock().await;
        let Some(session) = inner.sessions.get(name) else {
            return false;
        };
        // A full channel means a refresh is already pending.
        let _ = session.refresh_tx.try_send(());
        tracing::debug!(target_name = %name, "Refresh requested");
        true
    }

    /// Receiver that observes every published state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<MonitorState>> {
        self.shared.publisher.subscribe()
    }

    /// Most recently published state
    #[must_use]
    pub fn state(&self) -> Arc<MonitorState> {
        self.shared.publisher.borrow().clone()
    }

    /// Names of all monitored targets
    #[must_use]
    pub fn target_names(&self) -> Vec<String> {
        self.state().names()
    }

    /// Whether a target with this name is monitored
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.state().contains(name)
    }
}
