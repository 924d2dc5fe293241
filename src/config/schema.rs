//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every field has a default, so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GigaConfig {
    /// Service identity and listen address.
    pub app: AppConfig,

    /// Serving and shutdown behaviour.
    pub server: ServerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Service name used in lifecycle logs.
    pub name: String,

    /// Listen address (e.g., "127.0.0.1:9999").
    pub addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "giga".to_string(),
            addr: "127.0.0.1:9999".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// How long shutdown waits for in-flight requests.
    pub shutdown_timeout_secs: u64,

    /// Per-request deadline; exceeded requests get 408.
    pub request_timeout_secs: u64,

    /// Largest request body buffered for handlers.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: 5,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub log_filter: String,

    pub log_format: LogFormat,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "giga=info,api_proxy=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
