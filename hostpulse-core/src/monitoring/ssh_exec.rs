//! SSH command execution for monitoring
//!
//! Runs the bundled diagnostic command on a remote host via the system `ssh`
//! client. One process is spawned per poll; a hard timeout kills it if the
//! host stalls.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ExecError;

use super::settings::MonitorSettings;

/// Default SSH port; `-p` is only passed for other ports
pub const DEFAULT_SSH_PORT: u16 = 22;

/// What to run and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Remote hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Remote user
    pub user: String,
    /// Private key files, each passed with `-i`
    pub key_paths: Arc<[PathBuf]>,
    /// Command line sent to the remote shell
    pub command: String,
}

/// Exit status and captured streams of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with code 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// First non-empty line of stderr, or a generic message with the exit code
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.stderr
            .trim()
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map_or_else(
                || match self.exit_code {
                    Some(code) => format!("SSH exit code {code}"),
                    None => "SSH terminated by signal".to_string(),
                },
                str::to_string,
            )
    }
}

/// Result of a run bounded by a timeout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The process finished in time
    Completed(CommandOutput),
    /// The process was killed after the timeout
    TimedOut(Duration),
}

/// Transport that runs one command on a remote host
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Runs the request to completion.
    ///
    /// Dropping the returned future must terminate the underlying process;
    /// [`execute`] relies on this to enforce its timeout.
    ///
    /// # Errors
    /// Returns [`ExecError::Launch`] if the process cannot be started.
    async fn run(&self, request: &ExecRequest) -> Result<CommandOutput, ExecError>;
}

/// Runs `request` and gives up after `timeout`
///
/// # Errors
/// Propagates launch failures from the executor.
pub async fn execute(
    executor: &dyn RemoteExecutor,
    request: &ExecRequest,
    timeout: Duration,
) -> Result<ExecOutcome, ExecError> {
    match tokio::time::timeout(timeout, executor.run(request)).await {
        Ok(Ok(output)) => Ok(ExecOutcome::Completed(output)),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(ExecOutcome::TimedOut(timeout)),
    }
}

/// [`RemoteExecutor`] backed by the system `ssh` binary
#[derive(Debug, Clone)]
pub struct SshExecutor {
    program: String,
    connect_timeout_secs: u16,
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self::from_settings(&MonitorSettings::default())
    }
}

impl SshExecutor {
    /// Creates an executor for `program` (usually `ssh`)
    #[must_use]
    pub fn new(program: impl Into<String>, connect_timeout_secs: u16) -> Self {
        Self {
            program: program.into(),
            connect_timeout_secs,
        }
    }

    /// Creates an executor from monitoring settings
    #[must_use]
    pub fn from_settings(settings: &MonitorSettings) -> Self {
        Self::new(settings.ssh_program.clone(), settings.connect_timeout_secs)
    }

    /// Program that will be spawned
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds the argument list for `request`.
    ///
    /// Host keys are accepted without prompting and password prompts are
    /// disabled so a poll can never block on the terminal.
    #[must_use]
    pub fn args(&self, request: &ExecRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            "StrictHostKeyChecking=no".into(),
            "-o".into(),
            format!("ConnectTimeout={}", self.connect_timeout_secs).into(),
            "-o".into(),
            "BatchMode=yes".into(),
        ];

        for key in request.key_paths.iter() {
            args.push("-i".into());
            args.push(key.as_os_str().to_owned());
        }

        if request.port != DEFAULT_SSH_PORT {
            args.push("-p".into());
            args.push(request.port.to_string().into());
        }

        args.push(format!("{}@{}", request.user, request.host).into());
        args.push(request.command.clone().into());
        args
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, request: &ExecRequest) -> Result<CommandOutput, ExecError> {
        let args = self.args(request);
        tracing::debug!(
            host = %request.host,
            port = request.port,
            key_count = request.key_paths.len(),
            "Spawning {} for monitoring poll",
            self.program
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExecError::Launch {
                program: self.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
