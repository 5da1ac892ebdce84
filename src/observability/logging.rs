//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Resolve the filter: config directive, then RUST_LOG, then default
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log level configurable via config and environment

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither config nor RUST_LOG provide one.
const DEFAULT_FILTER: &str = "forwarded_rewrite=debug,tower_http=debug";

/// Initialize the tracing subscriber.
///
/// A directive from the configuration wins over `RUST_LOG`; the built-in
/// default applies when neither is set. Call once, before serving.
pub fn init(config_filter: Option<&str>) {
    let filter = match config_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
