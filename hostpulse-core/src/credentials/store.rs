//! Secret store backends for `vault://` key locators
//!
//! The production backend talks to the Secret Service API through the
//! `secret-tool` binary (GNOME Keyring, KDE Wallet, KeePassXC).

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretSlice;
use tokio::process::Command;
use zeroize::Zeroize;

use crate::error::{CredentialError, CredentialResult};
use crate::models::VAULT_PREFIX;

/// Application identifier used as the `application` attribute in keyring entries
const APP_ID: &str = "hostpulse";

/// Upper bound for one keyring lookup; a locked keyring may never answer
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of decrypted private keys
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the decrypted key bytes behind `locator`.
    ///
    /// # Errors
    /// Returns an error if the locator is malformed, the secret does not
    /// exist, or the backend cannot be reached.
    async fn retrieve(&self, locator: &str) -> CredentialResult<SecretSlice<u8>>;

    /// Short identifier for logs
    fn backend_id(&self) -> &'static str;
}

/// Extracts the key name from a `vault://<key>` locator
///
/// # Errors
/// Returns `CredentialError::InvalidLocator` if the prefix is missing or the
/// key name is empty.
pub fn locator_key(locator: &str) -> CredentialResult<&str> {
    locator
        .strip_prefix(VAULT_PREFIX)
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| CredentialError::InvalidLocator(locator.to_string()))
}

/// [`SecretStore`] backed by `secret-tool lookup`
#[derive(Debug, Clone)]
pub struct SecretToolStore {
    program: String,
    timeout: Duration,
}

impl Default for SecretToolStore {
    fn default() -> Self {
        Self::new("secret-tool")
    }
}

impl SecretToolStore {
    /// Creates a store that runs `program` instead of `secret-tool`
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Sets how long a lookup may take before the child is killed
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SecretStore for SecretToolStore {
    #[tracing::instrument(skip(self), fields(backend = "secret-tool"))]
    async fn retrieve(&self, locator: &str) -> CredentialResult<SecretSlice<u8>> {
        let key = locator_key(locator)?;

        let lookup = Command::new(&self.program)
            .args(["lookup", "application", APP_ID, "key", key])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let mut output = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| {
                CredentialError::BackendUnavailable(format!(
                    "{} did not answer within {}s",
                    self.program,
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| {
                CredentialError::BackendUnavailable(format!(
                    "Failed to run {}: {e}",
                    self.program
                ))
            })?;

        if !output.status.success() {
            output.stdout.zeroize();
            return Err(CredentialError::NotFound(locator.to_string()));
        }

        let value = output.stdout.trim_ascii().to_vec();
        output.stdout.zeroize();
        if value.is_empty() {
            return Err(CredentialError::NotFound(locator.to_string()));
        }

        tracing::debug!("Retrieved key from keyring");
        Ok(SecretSlice::from(value))
    }

    fn backend_id(&self) -> &'static str {
        "secret-tool"
    }
}

/// [`SecretStore`] for setups without a keyring; every lookup fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecretStore;

#[async_trait]
impl SecretStore for NoSecretStore {
    async fn retrieve(&self, locator: &str) -> CredentialResult<SecretSlice<u8>> {
        locator_key(locator)?;
        Err(CredentialError::BackendUnavailable(
            "no secret store configured".into(),
        ))
    }

    fn backend_id(&self) -> &'static str {
        "none"
    }
}
