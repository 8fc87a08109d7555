//! Legacy process-wide properties.
//!
//! Older consumers look up the active profile and the base service URL by key
//! instead of asking the deployment context. The two keys are published once per
//! start and nothing else may be added here.

use std::sync::OnceLock;

use dashmap::DashMap;

/// Key of the active profile name.
pub const CURRENT_PROFILE: &str = "currentProfile";

/// Key of the base service URL.
pub const BASE_URL: &str = "baseUrl";

static PROPERTIES: OnceLock<DashMap<&'static str, String>> = OnceLock::new();

fn properties() -> &'static DashMap<&'static str, String> {
    PROPERTIES.get_or_init(DashMap::new)
}

/// Publish the legacy properties for this process.
#[deprecated(note = "read the profile and URL from `DeploymentContext`; remove once legacy readers migrate")]
pub fn publish(profile: &str, base_url: &str) {
    let properties = properties();
    properties.insert(CURRENT_PROFILE, profile.to_string());
    properties.insert(BASE_URL, base_url.to_string());
    tracing::debug!(profile, base_url, "Legacy properties published");
}

/// Read a legacy property.
#[deprecated(note = "read the profile and URL from `DeploymentContext`; remove once legacy readers migrate")]
pub fn property(key: &str) -> Option<String> {
    properties().get(key).map(|value| value.value().clone())
}
