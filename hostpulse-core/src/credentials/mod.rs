//! Credential resolution for monitoring sessions
//!
//! Key references from a profile are resolved into key files: keyring entries
//! and inline keys become [`EphemeralKeyFile`]s, filesystem paths are used as
//! they are.

mod ephemeral;
mod resolver;
mod store;

pub use ephemeral::{EphemeralKeyFile, normalize_key};
pub use resolver::{CredentialMaterial, CredentialResolver, DEFAULT_KEY_NAMES};
pub use store::{
    DEFAULT_LOOKUP_TIMEOUT, NoSecretStore, SecretStore, SecretToolStore, locator_key,
};
