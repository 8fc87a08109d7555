//! Application initialization.
//!
//! # Responsibilities
//! - Run every registered [`Initializer`] against its application configuration
//! - Publish the set of initialized applications for the HTTP handlers
//!
//! # Design Decisions
//! - Initializers run sequentially, in registration order
//! - An initializer without a matching configuration fails the whole start
//! - Applications are published only after every initializer succeeded

use std::error::Error as StdError;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigMap, ServiceConfig};

/// Error type for application initialization.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no configuration found for application `{name}`")]
    MissingConfiguration { name: String },

    #[error("application `{name}` failed to initialize")]
    Failed {
        name: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl InitError {
    pub fn failed(name: impl Into<String>, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Failed {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Initializes application state before the service accepts work.
pub trait AppInitializer: Send + Sync {
    fn init(
        &self,
        configs: &ConfigMap,
        core: &Arc<ServiceConfig>,
        profile_name: &str,
        profile_root: &Path,
    ) -> Result<(), InitError>;
}

/// What an [`Initializer`] gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    /// Application name (key in the configuration map).
    pub name: &'a str,
    /// The application's own configuration.
    pub config: &'a Arc<ServiceConfig>,
    /// The core configuration of the service.
    pub core: &'a Arc<ServiceConfig>,
    pub profile_name: &'a str,
    pub profile_root: &'a Path,
}

/// Startup hook for one application.
pub trait Initializer: Send + Sync {
    /// Application this initializer belongs to.
    fn name(&self) -> &str;

    fn init(&self, ctx: &InitContext<'_>) -> Result<(), InitError>;
}

/// An initialized application, as reported by `GET /apps`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AppSummary {
    pub name: String,
    pub service_url: String,
    pub initializers: usize,
}

/// Applications initialized in this process.
#[derive(Debug, Default)]
pub struct Applications {
    ready: ArcSwapOption<Vec<AppSummary>>,
}

impl Applications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, apps: Vec<AppSummary>) {
        self.ready.store(Some(Arc::new(apps)));
    }

    /// Whether initialization completed.
    pub fn is_ready(&self) -> bool {
        self.ready.load().is_some()
    }

    /// Initialized applications; empty until initialization completes.
    pub fn list(&self) -> Vec<AppSummary> {
        self.ready
            .load_full()
            .map(|apps| apps.as_ref().clone())
            .unwrap_or_default()
    }
}

/// Default [`AppInitializer`].
pub struct ApplicationInitializer {
    initializers: Vec<Arc<dyn Initializer>>,
    applications: Arc<Applications>,
}

impl ApplicationInitializer {
    pub fn new(initializers: Vec<Arc<dyn Initializer>>, applications: Arc<Applications>) -> Self {
        Self {
            initializers,
            applications,
        }
    }
}

impl AppInitializer for ApplicationInitializer {
    fn init(
        &self,
        configs: &ConfigMap,
        core: &Arc<ServiceConfig>,
        profile_name: &str,
        profile_root: &Path,
    ) -> Result<(), InitError> {
        for initializer in &self.initializers {
            let name = initializer.name();
            let config = configs
                .get(name)
                .ok_or_else(|| InitError::MissingConfiguration {
                    name: name.to_string(),
                })?;

            tracing::info!(application = name, profile = profile_name, "Initializing application");
            initializer.init(&InitContext {
                name,
                config,
                core,
                profile_name,
                profile_root,
            })?;
        }

        let apps: Vec<AppSummary> = configs
            .iter()
            .map(|(name, config)| AppSummary {
                name: name.clone(),
                service_url: config.service_url.clone(),
                initializers: self
                    .initializers
                    .iter()
                    .filter(|i| i.name() == name)
                    .count(),
            })
            .collect();

        tracing::info!(
            service = %core.service_name,
            applications = apps.len(),
            initializers = self.initializers.len(),
            "Applications initialized"
        );
        self.applications.publish(apps);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct Recording {
        name: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Initializer for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn init(&self, ctx: &InitContext<'_>) -> Result<(), InitError> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", ctx.name, ctx.config.service_url, ctx.profile_name));
            if self.fail {
                return Err(InitError::failed(ctx.name, "boom"));
            }
            Ok(())
        }
    }

    fn configs() -> ConfigMap {
        let mut configs = ConfigMap::new();
        configs.insert(
            "billing".into(),
            Arc::new(ServiceConfig::new("billing", "http://billing")),
        );
        configs.insert(
            "ledger".into(),
            Arc::new(ServiceConfig::new("ledger", "http://ledger")),
        );
        configs
    }

    fn core() -> Arc<ServiceConfig> {
        Arc::new(ServiceConfig::new("billing", "http://billing"))
    }

    #[test]
    fn runs_initializers_and_publishes_apps() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let applications = Arc::new(Applications::new());
        let initializer = ApplicationInitializer::new(
            vec![Arc::new(Recording {
                name: "ledger",
                seen: Arc::clone(&seen),
                fail: false,
            })],
            Arc::clone(&applications),
        );
        assert!(!applications.is_ready());

        initializer
            .init(&configs(), &core(), "prod", &PathBuf::from("/etc/prod"))
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["ledger:http://ledger:prod".to_string()]);
        assert!(applications.is_ready());
        let apps = applications.list();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].initializers, 0);
        assert_eq!(apps[1].name, "ledger");
        assert_eq!(apps[1].initializers, 1);
    }

    #[test]
    fn missing_configuration_fails() {
        let applications = Arc::new(Applications::new());
        let initializer = ApplicationInitializer::new(
            vec![Arc::new(Recording {
                name: "payroll",
                seen: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            })],
            Arc::clone(&applications),
        );

        let err = initializer
            .init(&configs(), &core(), "prod", Path::new("/etc/prod"))
            .unwrap_err();
        assert!(matches!(err, InitError::MissingConfiguration { ref name } if name == "payroll"));
        assert!(!applications.is_ready());
    }

    #[test]
    fn initializer_failure_leaves_apps_unpublished() {
        let applications = Arc::new(Applications::new());
        let initializer = ApplicationInitializer::new(
            vec![Arc::new(Recording {
                name: "billing",
                seen: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            })],
            Arc::clone(&applications),
        );

        let err = initializer
            .init(&configs(), &core(), "prod", Path::new("/etc/prod"))
            .unwrap_err();
        assert_eq!(err.to_string(), "application `billing` failed to initialize");
        assert!(applications.list().is_empty());
    }
}
