//! Monitoring settings for remote host polling
//!
//! Stored in `config.toml` under `[monitoring]`. Every field has a default so
//! an empty section (or a missing file) yields a working configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global monitoring settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Polling interval in seconds (1–60, default: 3)
    #[serde(default = "default_interval_secs")]
    pub poll_interval_secs: u8,
    /// Hard limit for one poll, after which `ssh` is killed (default: 15)
    #[serde(default = "default_exec_timeout_secs")]
    pub exec_timeout_secs: u16,
    /// Value passed as `-o ConnectTimeout=` (default: 8)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u16,
    /// Remote shell client binary (default: `ssh`)
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,
    /// Directory scanned for default keys (default: `~/.ssh`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_dir: Option<PathBuf>,
    /// Directory for ephemeral key files (default: system temp dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

const fn default_interval_secs() -> u8 {
    3
}

const fn default_exec_timeout_secs() -> u16 {
    15
}

const fn default_connect_timeout_secs() -> u16 {
    8
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_interval_secs(),
            exec_timeout_secs: default_exec_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            ssh_program: default_ssh_program(),
            key_dir: None,
            temp_dir: None,
        }
    }
}

impl MonitorSettings {
    /// Returns the interval clamped to the valid range (1–60 seconds)
    #[must_use]
    pub const fn effective_interval_secs(&self) -> u8 {
        if self.poll_interval_secs == 0 {
            1
        } else if self.poll_interval_secs > 60 {
            60
        } else {
            self.poll_interval_secs
        }
    }

    /// Polling interval as a [`Duration`]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.effective_interval_secs()))
    }

    /// Hard timeout for one poll (at least one second)
    #[must_use]
    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.exec_timeout_secs.max(1)))
    }

    /// Directory scanned for `id_ed25519`, `id_rsa`, `id_ecdsa`
    #[must_use]
    pub fn default_key_dir(&self) -> Option<PathBuf> {
        self.key_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".ssh")))
    }

    /// Directory where ephemeral key files are created
    #[must_use]
    pub fn ephemeral_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
