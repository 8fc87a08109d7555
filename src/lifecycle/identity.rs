//! Service identity used for lifecycle attribution.

use std::fmt;

use crate::config::ServiceConfig;

/// Name used when the service could not be identified.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Who is starting, derived once from the core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    name: String,
    profile: String,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: profile.into(),
        }
    }

    pub fn from_config(core: &ServiceConfig, profile: &str) -> Self {
        Self::new(core.service_name.clone(), profile)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Display name for an optional identity.
pub fn name_or_unknown(identity: Option<&ServiceIdentity>) -> &str {
    identity.map_or(UNKNOWN_SERVICE, ServiceIdentity::name)
}
