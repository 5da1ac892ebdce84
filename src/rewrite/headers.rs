//! Forwarded header access.
//!
//! # Responsibilities
//! - Name the two headers the edge load balancer annotates requests with
//! - Distinguish "header absent" from "header present but unreadable"
//!
//! # Design Decisions
//! - Single-value lookup only; multi-hop comma-separated lists are out of
//!   scope and whatever `HeaderMap::get` returns first is what we act on

use axum::http::HeaderMap;

/// Client-facing scheme as reported by the load balancer.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Client-facing port as reported by the load balancer.
pub const X_FORWARDED_PORT: &str = "x-forwarded-port";

/// Look up a forwarding header.
///
/// `None` means the header is absent. A value with non-visible-ASCII bytes
/// is returned as an empty string so it aborts the rewrite like any other
/// malformed value instead of being mistaken for an absent header.
pub fn forwarded_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).map(|value| value.to_str().unwrap_or(""))
}
