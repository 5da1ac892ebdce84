//! Forwarded-URI rewrite service.
//!
//! Reconciles the backend-visible request URI with the client-facing
//! scheme/port reported by an edge load balancer via `x-forwarded-proto`
//! and `x-forwarded-port`, before any routing decision is made.

pub mod config;
pub mod http;
pub mod observability;
pub mod rewrite;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use rewrite::{reconcile, ForwardedUriLayer};
