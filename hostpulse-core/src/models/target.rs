//! Descriptor used to register a monitoring target

use super::profile::{ConnectionProfile, KeyReference};

/// Everything needed to start monitoring one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Profile name; also the target identifier in the registry
    pub name: String,
    /// Hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Remote user
    pub user: String,
    /// Extra key to try after the profile's `private_keys`
    pub private_key: Option<KeyReference>,
}

impl TargetDescriptor {
    /// Creates a descriptor without an extra key
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            user: user.into(),
            private_key: None,
        }
    }

    /// Sets the extra key
    #[must_use]
    pub fn with_private_key(mut self, key: KeyReference) -> Self {
        self.private_key = Some(key);
        self
    }
}

impl From<&ConnectionProfile> for TargetDescriptor {
    fn from(profile: &ConnectionProfile) -> Self {
        Self::new(
            profile.name.clone(),
            profile.host.clone(),
            profile.port,
            profile.user.clone(),
        )
    }
}
