//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! StartupArgs (config dir, profile, service)
//!     → loader.rs (locate profile, parse TOML)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (core) + ConfigMap (every application in the profile)
//!     → shared via Arc with the container, deployment context and initializers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigResolver, FileResolver, FileResolverFactory, ResolverFactory};
pub use schema::{ConfigMap, ServerSettings, ServiceConfig, WebConfig};
pub use validation::ValidationError;
