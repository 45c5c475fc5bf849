//! Connection profiles and key references
//!
//! Profiles arrive as loosely typed configuration data ([`RawProfile`]) and
//! are validated here, at the boundary, into [`ConnectionProfile`] values with
//! classified [`KeyReference`]s. Nothing past this module sees raw strings.

use std::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Locator prefix for keys held in the secret store
pub const VAULT_PREFIX: &str = "vault://";

/// Profile type handled by the monitor
pub const SSH_PROFILE_TYPE: &str = "ssh";

const DEFAULT_USER: &str = "root";

/// One declared private key
#[derive(Clone)]
pub enum KeyReference {
    /// Key stored encrypted in the secret store (`vault://…`)
    Vault(String),
    /// Key material pasted directly into the profile
    Inline(SecretString),
    /// Key file on the local filesystem
    Path(PathBuf),
}

impl KeyReference {
    /// Classifies a raw reference string.
    ///
    /// Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        if raw.starts_with(VAULT_PREFIX) {
            return Some(Self::Vault(raw.to_string()));
        }
        if raw.contains("-----BEGIN") || raw.contains("PRIVATE KEY") {
            return Some(Self::Inline(SecretString::from(raw.to_string())));
        }
        let expanded = shellexpand::tilde(raw.trim());
        Some(Self::Path(PathBuf::from(expanded.as_ref())))
    }

    /// Short kind label for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Vault(_) => "vault",
            Self::Inline(_) => "inline",
            Self::Path(_) => "path",
        }
    }
}

impl PartialEq for KeyReference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Vault(a), Self::Vault(b)) => a == b,
            (Self::Inline(a), Self::Inline(b)) => a.expose_secret() == b.expose_secret(),
            (Self::Path(a), Self::Path(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for KeyReference {}

impl fmt::Debug for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vault(locator) => f.debug_tuple("Vault").field(locator).finish(),
            Self::Inline(_) => f.write_str("Inline([REDACTED])"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// Profile entry as it appears in `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    /// Profile name
    pub name: String,
    /// Profile type; only `ssh` profiles are monitored
    #[serde(rename = "type", default = "default_profile_type")]
    pub kind: String,
    /// Hostname or IP
    pub host: String,
    /// SSH port (default 22)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Remote user (default `root`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Key references: vault locators, inline keys or paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_keys: Vec<String>,
    /// Additional key file paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_paths: Vec<String>,
}

fn default_profile_type() -> String {
    SSH_PROFILE_TYPE.to_string()
}

impl RawProfile {
    /// Whether this entry describes an SSH connection
    #[must_use]
    pub fn is_ssh(&self) -> bool {
        self.kind.eq_ignore_ascii_case(SSH_PROFILE_TYPE)
    }
}

/// Validated SSH connection profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Profile name
    pub name: String,
    /// Hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Remote user
    pub user: String,
    /// Keys from the `private_keys` list, in declared order
    pub private_keys: Vec<KeyReference>,
    /// Keys from the `key_paths` list, in declared order
    pub key_paths: Vec<KeyReference>,
}

impl ConnectionProfile {
    /// All key references in resolution order.
    ///
    /// `private_keys` come first, then `extra` unless it repeats one of them,
    /// then `key_paths`.
    #[must_use]
    pub fn key_references(&self, extra: Option<&KeyReference>) -> Vec<KeyReference> {
        let mut refs = self.private_keys.clone();
        if let Some(extra) = extra
            && !refs.contains(extra)
        {
            refs.push(extra.clone());
        }
        refs.extend(self.key_paths.iter().cloned());
        refs
    }
}

impl TryFrom<&RawProfile> for ConnectionProfile {
    type Error = ConfigError;

    fn try_from(raw: &RawProfile) -> ConfigResult<Self> {
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("profile name is empty".into()));
        }
        let host = raw.host.trim();
        if host.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "profile '{name}' has no host"
            )));
        }
        if raw.port == Some(0) {
            return Err(ConfigError::Invalid(format!(
                "profile '{name}' has port 0"
            )));
        }

        let user = raw
            .user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USER);

        Ok(Self {
            name: name.to_string(),
            host: host.to_string(),
            port: raw.port.unwrap_or(22),
            user: user.to_string(),
            private_keys: raw
                .private_keys
                .iter()
                .filter_map(|k| KeyReference::classify(k))
                .collect(),
            key_paths: raw
                .key_paths
                .iter()
                .filter_map(|k| KeyReference::classify(k))
                .collect(),
        })
    }
}

/// Lookup of declared connection profiles by name
pub trait ProfileSource: Send + Sync {
    /// Returns the SSH profile called `name`, if declared
    fn find_profile(&self, name: &str) -> Option<ConnectionProfile>;
}

/// [`ProfileSource`] over the `[[profiles]]` entries of the configuration
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: Vec<ConnectionProfile>,
}

impl ProfileCatalog {
    /// Builds a catalog from raw entries.
    ///
    /// Non-SSH entries are ignored; invalid entries are logged and skipped.
    /// When two entries share a name the first one wins.
    #[must_use]
    pub fn from_raw(raw: &[RawProfile]) -> Self {
        let mut profiles: Vec<ConnectionProfile> = Vec::with_capacity(raw.len());
        for entry in raw.iter().filter(|p| p.is_ssh()) {
            match ConnectionProfile::try_from(entry) {
                Ok(profile) if profiles.iter().any(|p| p.name == profile.name) => {
                    tracing::warn!(profile = %profile.name, "Duplicate profile name, keeping the first");
                }
                Ok(profile) => profiles.push(profile),
                Err(e) => tracing::warn!(error = %e, "Skipping invalid profile"),
            }
        }
        Self { profiles }
    }

    /// All valid SSH profiles
    #[must_use]
    pub fn profiles(&self) -> &[ConnectionProfile] {
        &self.profiles
    }

    /// Profile names in declared order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Profile by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConnectionProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

impl ProfileSource for ProfileCatalog {
    fn find_profile(&self, name: &str) -> Option<ConnectionProfile> {
        self.get(name).cloned()
    }
}
