//! Configuration loading from disk.
//!
//! Layout on disk:
//! ```text
//! <config_dir>/
//!     <profile>/            ← profile root
//!         <service>.toml    ← core configuration
//!         <app>.toml        ← one file per sub-application
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::args::StartupArgs;
use crate::config::schema::{ConfigMap, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile `{profile}` not found at {}", .root.display())]
    ProfileNotFound { profile: String, root: PathBuf },

    #[error("service `{service}` not found in profile `{profile}`")]
    ServiceNotFound { service: String, profile: String },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration in {}: {}", .path.display(), join_errors(.errors))]
    Validation {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a single configuration document.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ServiceConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&config).map_err(|errors| ConfigError::Validation {
        path: path.to_path_buf(),
        errors,
    })?;

    Ok(config)
}

/// Source of the core configuration and the per-application configuration map.
pub trait ConfigResolver {
    /// The configuration identifying the service being started.
    fn core_config(&self) -> Result<ServiceConfig, ConfigError>;

    /// Every application configuration in the active profile.
    fn load_all(&self) -> Result<ConfigMap, ConfigError>;

    /// Name of the active profile.
    fn profile_name(&self) -> &str;

    /// Directory holding the active profile.
    fn profile_root(&self) -> &Path;
}

/// Opens a [`ConfigResolver`] for a set of startup arguments.
///
/// Bound in the base container so the resolver itself is obtained by injection.
pub trait ResolverFactory: Send + Sync {
    fn open(&self, args: &StartupArgs) -> Result<Box<dyn ConfigResolver>, ConfigError>;
}

/// Resolver over the on-disk layout described in the module docs.
#[derive(Debug, Clone)]
pub struct FileResolver {
    profile: String,
    service: String,
    root: PathBuf,
}

impl FileResolver {
    /// Locate `profile` under `config_dir`.
    pub fn open(
        config_dir: &Path,
        profile: &str,
        service: &str,
    ) -> Result<Self, ConfigError> {
        let root = config_dir.join(profile);
        if !root.is_dir() {
            return Err(ConfigError::ProfileNotFound {
                profile: profile.to_string(),
                root,
            });
        }

        tracing::debug!(profile, root = %root.display(), "Profile located");
        Ok(Self {
            profile: profile.to_string(),
            service: service.to_string(),
            root,
        })
    }
}

impl ConfigResolver for FileResolver {
    fn core_config(&self) -> Result<ServiceConfig, ConfigError> {
        let path = self.root.join(format!("{}.toml", self.service));
        if !path.is_file() {
            return Err(ConfigError::ServiceNotFound {
                service: self.service.clone(),
                profile: self.profile.clone(),
            });
        }
        load_config(&path)
    }

    fn load_all(&self) -> Result<ConfigMap, ConfigError> {
        let entries = fs::read_dir(&self.root).map_err(|source| ConfigError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut configs = ConfigMap::new();
        for entry in entries {
            let path = entry
                .map_err(|source| ConfigError::Io {
                    path: self.root.clone(),
                    source,
                })?
                .path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = name.to_string();
            configs.insert(name, Arc::new(load_config(&path)?));
        }

        tracing::debug!(
            profile = %self.profile,
            applications = configs.len(),
            "Application configurations loaded"
        );
        Ok(configs)
    }

    fn profile_name(&self) -> &str {
        &self.profile
    }

    fn profile_root(&self) -> &Path {
        &self.root
    }
}

/// [`ResolverFactory`] producing [`FileResolver`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolverFactory;

impl ResolverFactory for FileResolverFactory {
    fn open(&self, args: &StartupArgs) -> Result<Box<dyn ConfigResolver>, ConfigError> {
        let resolver = FileResolver::open(&args.config_dir, &args.profile, &args.service)?;
        Ok(Box::new(resolver))
    }
}
