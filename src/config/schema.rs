//! Configuration schema definitions.
//!
//! A service is described by one TOML document. The same shape is used for the
//! core configuration and for every sub-application in the profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Sub-application name to its configuration.
pub type ConfigMap = BTreeMap<String, Arc<ServiceConfig>>;

/// Root configuration for a service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Logical service name, used for log attribution.
    pub service_name: String,

    /// Public base URL of the service (e.g., "http://localhost:8080").
    pub service_url: String,

    /// Network exposure.
    #[serde(default)]
    pub web: WebConfig,

    /// Settings handed to the HTTP server when the service runs in serving mode.
    #[serde(default)]
    pub server: ServerSettings,

    /// Free-form application settings.
    #[serde(default)]
    pub settings: toml::Table,
}

impl ServiceConfig {
    /// Create a configuration with default web and server sections.
    pub fn new(service_name: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_url: service_url.into(),
            web: WebConfig::default(),
            server: ServerSettings::default(),
            settings: toml::Table::new(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Port to listen on. `0` asks the OS for an ephemeral port.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind (IP address).
    pub bind_host: String,

    /// Maximum requests handled concurrently (backpressure).
    pub max_connections: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Runtime worker threads. Defaults to the number of cores.
    pub worker_threads: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            max_connections: 10_000,
            request_timeout_secs: 30,
            worker_threads: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_uses_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            service_name = "billing"
            service_url = "http://billing.internal"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.port, 8080);
        assert_eq!(config.server.bind_host, "0.0.0.0");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert!(config.settings.is_empty());
    }

    #[test]
    fn sections_override_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            service_name = "billing"
            service_url = "http://billing.internal"

            [web]
            port = 9000

            [server]
            bind_host = "127.0.0.1"
            worker_threads = 2

            [settings]
            currency = "EUR"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.server.bind_host, "127.0.0.1");
        assert_eq!(config.server.max_connections, 10_000);
        assert_eq!(config.server.worker_threads, Some(2));
        assert_eq!(
            config.settings.get("currency").and_then(|v| v.as_str()),
            Some("EUR")
        );
    }
}
