//! Connection profiles and monitoring target descriptors

mod profile;
mod target;

pub use profile::{
    ConnectionProfile, KeyReference, ProfileCatalog, ProfileSource, RawProfile, SSH_PROFILE_TYPE,
    VAULT_PREFIX,
};
pub use target::TargetDescriptor;
