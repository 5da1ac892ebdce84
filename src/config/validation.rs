//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses/URIs parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::Uri;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::rewrite::HttpScheme;

/// A single semantic problem with the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}': must be host:port")]
    InvalidBindAddress(String),

    #[error("invalid upstream URI '{0}': {1}")]
    InvalidUpstreamUri(String, String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(upstream) = &config.upstream {
        match upstream.uri.parse::<Uri>() {
            Ok(uri) => {
                let scheme_ok = uri
                    .scheme_str()
                    .and_then(HttpScheme::parse)
                    .is_some();
                if !scheme_ok || uri.authority().is_none() {
                    errors.push(ValidationError::InvalidUpstreamUri(
                        upstream.uri.clone(),
                        "must be an absolute http(s) URI".to_string(),
                    ));
                }
            }
            Err(e) => {
                errors.push(ValidationError::InvalidUpstreamUri(
                    upstream.uri.clone(),
                    e.to_string(),
                ));
            }
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
