//! Property tests for profile validation and key classification

use hostpulse_core::models::{ConnectionProfile, KeyReference, RawProfile};
use proptest::prelude::*;

fn raw(name: String, host: String, port: Option<u16>, user: Option<String>) -> RawProfile {
    RawProfile {
        name,
        kind: "ssh".into(),
        host,
        port,
        user,
        private_keys: Vec::new(),
        key_paths: Vec::new(),
    }
}

proptest! {
    /// Property: valid entries keep their fields and fill defaults
    #[test]
    fn valid_profiles_normalize(
        name in "[a-z][a-z0-9-]{0,20}",
        host in "[a-z0-9.]{1,30}",
        port in proptest::option::of(1u16..),
        user in proptest::option::of("[a-z]{1,12}"),
    ) {
        let profile = ConnectionProfile::try_from(&raw(name.clone(), host.clone(), port, user.clone()))
            .expect("valid profile");
        prop_assert_eq!(profile.name, name);
        prop_assert_eq!(profile.host, host);
        prop_assert_eq!(profile.port, port.unwrap_or(22));
        prop_assert_eq!(profile.user, user.unwrap_or_else(|| "root".into()));
    }

    /// Property: blank names or hosts are rejected
    #[test]
    fn blank_fields_rejected(blank in "[ \t]{0,5}", other in "[a-z]{1,10}") {
        prop_assert!(ConnectionProfile::try_from(&raw(blank.clone(), other.clone(), None, None)).is_err());
        prop_assert!(ConnectionProfile::try_from(&raw(other, blank, None, None)).is_err());
    }

    /// Property: vault locators are never treated as paths
    #[test]
    fn vault_locators_classified(key in "[A-Za-z0-9_-]{1,40}") {
        let locator = format!("vault://{key}");
        prop_assert_eq!(KeyReference::classify(&locator), Some(KeyReference::Vault(locator)));
    }
}
