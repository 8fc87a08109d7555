//! Current deployment context.
//!
//! Holds the core configuration of the running service so components created
//! after bootstrap can find out which deployment they belong to.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::config::ServiceConfig;

/// Published reference to the current core configuration.
#[derive(Debug, Default)]
pub struct DeploymentContext {
    current: ArcSwapOption<ServiceConfig>,
}

impl DeploymentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the core configuration of this deployment.
    pub fn set_current(&self, config: Arc<ServiceConfig>) {
        tracing::info!(
            service = %config.service_name,
            service_url = %config.service_url,
            "Deployment context bound"
        );
        self.current.store(Some(config));
    }

    /// The bound core configuration, if bootstrap got that far.
    pub fn current(&self) -> Option<Arc<ServiceConfig>> {
        self.current.load_full()
    }

    pub fn service_name(&self) -> Option<String> {
        self.current
            .load()
            .as_ref()
            .map(|config| config.service_name.clone())
    }
}
