//! Startup errors.
//!
//! Every collaborator failure is carried as one [`BootstrapError`] variant and
//! surfaced to the caller as a single [`StartupFailure`].

use thiserror::Error;

use crate::app::InitError;
use crate::config::ConfigError;
use crate::container::ContainerError;
use crate::http::LaunchError;

/// Cause of a failed bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("container construction failed")]
    Container(#[from] ContainerError),

    #[error("configuration resolution failed")]
    Config(#[from] ConfigError),

    #[error("server launch failed")]
    Launch(#[from] LaunchError),

    #[error("application initialization failed")]
    Init(#[from] InitError),

    #[error("bootstrap already ran in this process")]
    AlreadyStarted,
}

/// The only error returned by [`crate::lifecycle::Bootstrap::start_service`].
#[derive(Debug, Error)]
#[error("service initialization failed for {service}")]
pub struct StartupFailure {
    service: String,
    #[source]
    source: BootstrapError,
}

impl StartupFailure {
    pub fn new(service: impl Into<String>, source: BootstrapError) -> Self {
        Self {
            service: service.into(),
            source,
        }
    }

    /// Name of the service the failure is attributed to, or `unknown`.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn cause(&self) -> &BootstrapError {
        &self.source
    }

    pub fn into_cause(self) -> BootstrapError {
        self.source
    }
}
