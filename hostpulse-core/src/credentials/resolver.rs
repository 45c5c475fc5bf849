//! Key resolution for monitoring sessions
//!
//! Turns a profile's declared key references into a list of key files `ssh`
//! can read. Each reference is handled independently; a reference that cannot
//! be resolved is logged and skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::models::{KeyReference, ProfileSource};
use crate::monitoring::MonitorSettings;

use super::ephemeral::EphemeralKeyFile;
use super::store::SecretStore;

/// Default identities tried when nothing else resolved, in order
pub const DEFAULT_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

/// Key files for one monitoring session
///
/// Ephemeral files are owned here and removed by [`cleanup`](Self::cleanup)
/// or, failing that, when the material is dropped.
#[derive(Debug, Default)]
pub struct CredentialMaterial {
    key_paths: Vec<PathBuf>,
    ephemeral: Vec<EphemeralKeyFile>,
}

impl CredentialMaterial {
    /// Key files in the order they should be offered
    #[must_use]
    pub fn key_paths(&self) -> &[PathBuf] {
        &self.key_paths
    }

    /// Files created for this session
    #[must_use]
    pub fn ephemeral_paths(&self) -> Vec<&Path> {
        self.ephemeral.iter().map(EphemeralKeyFile::path).collect()
    }

    /// Whether no key resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_paths.is_empty()
    }

    /// Deletes all ephemeral files, logging failures
    pub fn cleanup(self) {
        for file in self.ephemeral {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                tracing::debug!(path = %path.display(), error = %e, "Failed to remove ephemeral key file");
            }
        }
    }

    fn push_path(&mut self, path: PathBuf) {
        self.key_paths.push(path);
    }

    fn push_ephemeral(&mut self, file: EphemeralKeyFile) {
        self.key_paths.push(file.path().to_path_buf());
        self.ephemeral.push(file);
    }
}

/// Resolves key references against a profile source and a secret store
#[derive(Clone)]
pub struct CredentialResolver {
    profiles: Arc<dyn ProfileSource>,
    secrets: Arc<dyn SecretStore>,
    key_dir: Option<PathBuf>,
    temp_dir: PathBuf,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("secrets", &self.secrets.backend_id())
            .field("key_dir", &self.key_dir)
            .field("temp_dir", &self.temp_dir)
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    /// Creates a resolver using the key and temp directories from `settings`
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        secrets: Arc<dyn SecretStore>,
        settings: &MonitorSettings,
    ) -> Self {
        Self {
            profiles,
            secrets,
            key_dir: settings.default_key_dir(),
            temp_dir: settings.ephemeral_dir(),
        }
    }

    /// Resolves all keys for the target named `name`.
    ///
    /// `hint` is tried after the profile's `private_keys` unless it repeats
    /// one of them. An empty result is valid: `ssh` then falls back to its
    /// own agent and configuration.
    #[tracing::instrument(name = "credential.resolve", skip(self, hint), fields(backend = self.secrets.backend_id()))]
    pub async fn resolve(&self, name: &str, hint: Option<&KeyReference>) -> CredentialMaterial {
        let refs = match self.profiles.find_profile(name) {
            Some(profile) => profile.key_references(hint),
            None => {
                tracing::debug!("No profile found, using only the explicit key");
                hint.into_iter().cloned().collect()
            }
        };

        let mut material = CredentialMaterial::default();
        for reference in &refs {
            self.resolve_one(reference, &mut material).await;
        }

        if material.is_empty()
            && let Some(path) = self.default_identity()
        {
            tracing::debug!(path = %path.display(), "Using default identity");
            material.push_path(path);
        }

        tracing::debug!(
            keys = material.key_paths.len(),
            ephemeral = material.ephemeral.len(),
            "Resolved monitoring credentials"
        );
        material
    }

    async fn resolve_one(&self, reference: &KeyReference, material: &mut CredentialMaterial) {
        match reference {
            KeyReference::Vault(locator) => match self.secrets.retrieve(locator).await {
                Ok(secret) => self.materialize(secret.expose_secret(), material),
                Err(e) => {
                    tracing::warn!(locator = %locator, error = %e, "Failed to retrieve key from secret store");
                }
            },
            KeyReference::Inline(key) => self.materialize(key.expose_secret().as_bytes(), material),
            KeyReference::Path(path) => {
                if path.exists() {
                    material.push_path(path.clone());
                } else {
                    tracing::debug!(path = %path.display(), "Key file does not exist, skipping");
                }
            }
        }
    }

    fn materialize(&self, key: &[u8], material: &mut CredentialMaterial) {
        match EphemeralKeyFile::write(&self.temp_dir, key) {
            Ok(file) => material.push_ephemeral(file),
            Err(e) => tracing::warn!(error = %e, "Failed to write ephemeral key file"),
        }
    }

    fn default_identity(&self) -> Option<PathBuf> {
        let dir = self.key_dir.as_ref()?;
        DEFAULT_KEY_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }
}
