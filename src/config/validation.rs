//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, worker counts > 0)
//! - Check the service URL and bind host parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>

use std::net::IpAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service_name must not be empty")]
    EmptyServiceName,

    #[error("service_url `{url}` is not an http(s) URL")]
    InvalidServiceUrl { url: String },

    #[error("server.bind_host `{host}` is not an IP address")]
    InvalidBindHost { host: String },

    #[error("server.{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service_name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    let url_ok = Url::parse(&config.service_url)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !url_ok {
        errors.push(ValidationError::InvalidServiceUrl {
            url: config.service_url.clone(),
        });
    }

    if config.server.bind_host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidBindHost {
            host: config.server.bind_host.clone(),
        });
    }

    if config.server.max_connections == 0 {
        errors.push(ValidationError::Zero {
            field: "max_connections",
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "request_timeout_secs",
        });
    }
    if config.server.worker_threads == Some(0) {
        errors.push(ValidationError::Zero {
            field: "worker_threads",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
