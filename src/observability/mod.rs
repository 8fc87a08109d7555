//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`, JSON or pretty output
//! - Lifecycle lines use a dedicated target so they can be filtered and asserted
//! - Request ID flows through every HTTP request span

pub mod logging;

pub use logging::{env_filter, init_logging, LogFormat, LoggingConfig, LIFECYCLE_TARGET};
