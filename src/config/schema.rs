//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the rewrite service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Optional upstream to forward requests to. When absent the server
    /// runs in echo mode and reports the URI it observed.
    pub upstream: Option<UpstreamConfig>,

    /// Forwarded-URI rewrite settings.
    pub rewrite: RewriteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream backend to forward requests to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Absolute http(s) URI of the backend (e.g., "http://127.0.0.1:3000").
    pub uri: String,
}

/// Forwarded-URI rewrite settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Whether to apply x-forwarded-proto / x-forwarded-port at all.
    /// Disable when the fronting load balancer's headers are not trusted.
    pub enabled: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total per-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing filter directive (e.g., "forwarded_rewrite=debug").
    /// Falls back to RUST_LOG, then to the built-in default.
    pub log_filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.upstream.is_none());
        assert!(config.rewrite.enabled);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn parses_minimal_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9090"

            [upstream]
            uri = "http://127.0.0.1:3000"

            [rewrite]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9090");
        assert_eq!(config.upstream.unwrap().uri, "http://127.0.0.1:3000");
        assert!(!config.rewrite.enabled);
    }
}
