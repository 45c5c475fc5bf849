//! In-memory collaborators for tests and dry runs
//!
//! These implement the registry's seams without touching the network or the
//! desktop keyring: a fixed profile list, a map-backed secret store and an
//! executor that replays scripted responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretSlice;
use tokio::sync::Mutex;

use crate::credentials::{SecretStore, locator_key};
use crate::error::{CredentialError, CredentialResult, ExecError};
use crate::models::{ConnectionProfile, ProfileSource};
use crate::monitoring::{CommandOutput, ExecRequest, RemoteExecutor};

/// Realistic output of the monitoring command on a procps-based host
pub const SAMPLE_OUTPUT: &str = "\
%Cpu(s):  2.3 us,  0.7 sy,  0.0 ni, 96.7 id,  0.2 wa,  0.0 hi,  0.1 si,  0.0 st
---SEPARATOR---
               total        used        free      shared  buff/cache   available
Mem:            7976        1234        4210          12        2531        6480
Swap:           2047           0        2047
---SEPARATOR---
Filesystem      Size  Used Avail Use% Mounted on
/dev/sda1        50G   12G   35G  26% /
---SEPARATOR---
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  123456     100    0    0    0     0          0         0   123456     100    0    0    0     0       0          0
  eth0: 98765432   54321    0    0    0     0          0         0 12345678   23456    0    0    0     0       0          0
---SEPARATOR---
up 3 days, 4 hours, 12 minutes
";

/// [`ProfileSource`] over a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticProfiles {
    profiles: Vec<ConnectionProfile>,
}

impl StaticProfiles {
    /// Creates an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile
    #[must_use]
    pub fn with(mut self, profile: ConnectionProfile) -> Self {
        self.profiles.push(profile);
        self
    }
}

impl ProfileSource for StaticProfiles {
    fn find_profile(&self, name: &str) -> Option<ConnectionProfile> {
        self.profiles.iter().find(|p| p.name == name).cloned()
    }
}

/// [`SecretStore`] backed by a map of locator to key bytes
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, Vec<u8>>,
    lookups: AtomicUsize,
}

impl MemorySecretStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `key` under a full `vault://…` locator
    #[must_use]
    pub fn with(mut self, locator: impl Into<String>, key: impl Into<Vec<u8>>) -> Self {
        self.secrets.insert(locator.into(), key.into());
        self
    }

    /// Number of `retrieve` calls so far
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn retrieve(&self, locator: &str) -> CredentialResult<SecretSlice<u8>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        locator_key(locator)?;
        self.secrets
            .get(locator)
            .map(|key| SecretSlice::from(key.clone()))
            .ok_or_else(|| CredentialError::NotFound(locator.to_string()))
    }

    fn backend_id(&self) -> &'static str {
        "memory"
    }
}

/// One scripted executor response
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Return this output immediately
    Reply(CommandOutput),
    /// Wait, then return this output
    Delayed(Duration, CommandOutput),
    /// Fail as if the client binary were missing
    LaunchFailure,
}

impl ScriptStep {
    /// Successful run printing [`SAMPLE_OUTPUT`]
    #[must_use]
    pub fn sample() -> Self {
        Self::Reply(CommandOutput {
            exit_code: Some(0),
            stdout: SAMPLE_OUTPUT.to_string(),
            stderr: String::new(),
        })
    }

    /// Failed run with the given exit code and stderr
    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::Reply(CommandOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        })
    }

    /// Successful run printing [`SAMPLE_OUTPUT`] after `delay`
    #[must_use]
    pub fn slow(delay: Duration) -> Self {
        match Self::sample() {
            Self::Reply(output) => Self::Delayed(delay, output),
            other => other,
        }
    }
}

/// [`RemoteExecutor`] that replays a script
///
/// Steps are consumed in order; the last one repeats forever. Every request
/// is recorded, including ones that are later cancelled by a timeout.
#[derive(Debug)]
pub struct ScriptedExecutor {
    steps: Vec<ScriptStep>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ExecRequest>>,
}

impl ScriptedExecutor {
    /// Creates an executor; an empty script behaves like [`ScriptStep::sample`]
    #[must_use]
    pub fn new(steps: Vec<ScriptStep>) -> Arc<Self> {
        let steps = if steps.is_empty() {
            vec![ScriptStep::sample()]
        } else {
            steps
        };
        Arc::new(Self {
            steps,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of runs started
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<ExecRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn run(&self, request: &ExecRequest) -> Result<CommandOutput, ExecError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        let step = self
            .steps
            .get(index)
            .or_else(|| self.steps.last())
            .cloned()
            .unwrap_or_else(ScriptStep::sample);

        match step {
            ScriptStep::Reply(output) => Ok(output),
            ScriptStep::Delayed(delay, output) => {
                tokio::time::sleep(delay).await;
                Ok(output)
            }
            ScriptStep::LaunchFailure => Err(ExecError::Launch {
                program: "ssh".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}
