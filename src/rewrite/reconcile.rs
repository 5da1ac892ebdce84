//! URI reconciliation against load balancer forwarding hints.
//!
//! # Responsibilities
//! - Compute the client-facing URI from the backend-visible one plus the
//!   `x-forwarded-proto` / `x-forwarded-port` header values
//! - Elide the port when it is the default for the final scheme
//! - Degrade to "no change" on any malformed or ambiguous input
//!
//! # Design Decisions
//! - Pure function, no I/O, no shared state; safe to call concurrently
//! - Forwarding headers are operational metadata that may be absent,
//!   malformed, or attacker-supplied: under any doubt the URI is left alone
//! - Port elision compares against the default port of the *final* scheme,
//!   so an upgrade to https with an inherited port 80 keeps `:80` explicit

use axum::http::uri::{Authority, Scheme, Uri};

/// The two schemes the rewrite applies to. Anything else is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpScheme {
    Http,
    Https,
}

impl HttpScheme {
    /// Case-insensitive match against `http` / `https`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("http") {
            Some(Self::Http)
        } else if value.eq_ignore_ascii_case("https") {
            Some(Self::Https)
        } else {
            None
        }
    }

    /// Standard port for the scheme, elided from canonical URIs.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }

    fn as_scheme(self) -> Scheme {
        match self {
            Self::Http => Scheme::HTTP,
            Self::Https => Scheme::HTTPS,
        }
    }
}

/// Reconcile a request URI with the forwarding hints set by an edge
/// load balancer.
///
/// Returns `Some(corrected)` only when the corrected URI differs from
/// `incoming`. Every inconclusive input — relative request target,
/// non-HTTP(S) scheme on either side, unparsable port, reassembly failure —
/// returns `None` and the caller leaves the request untouched. The function
/// never fails observably and is idempotent: feeding a successful result
/// back in with the same headers yields `None`.
pub fn reconcile(
    incoming: &Uri,
    forwarded_proto: Option<&str>,
    forwarded_port: Option<&str>,
) -> Option<Uri> {
    // Origin-form and other relative targets carry no scheme to fix up.
    let scheme = incoming.scheme()?;
    // A scheme without an authority is not a URL we can rewrite.
    let authority = incoming.authority()?;

    // The headers are only trusted for genuine HTTP(S) traffic.
    let observed = HttpScheme::parse(scheme.as_str())?;
    let desired = match forwarded_proto {
        None => observed,
        Some(value) => HttpScheme::parse(value)?,
    };

    let observed_port = incoming.port_u16().unwrap_or(observed.default_port());
    let desired_port = match forwarded_port {
        None => observed_port,
        // A port we cannot parse aborts the whole rewrite; falling back to
        // the observed port would produce a half-applied hint.
        Some(value) => value.trim().parse::<u16>().ok()?,
    };

    // Keep the incoming scheme value when nothing changes.
    let scheme = if desired == observed {
        scheme.clone()
    } else {
        desired.as_scheme()
    };
    // Elision is judged against the final scheme: after an upgrade to https
    // an inherited port 80 stays explicit.
    let port = (desired_port != desired.default_port()).then_some(desired_port);

    let rebuilt = rebuild(incoming, authority, scheme, port)?;
    (rebuilt != *incoming).then_some(rebuilt)
}

/// Reassemble the URI with a new scheme/port, preserving user-info, host,
/// path and query. Any construction failure maps to "no change".
fn rebuild(incoming: &Uri, authority: &Authority, scheme: Scheme, port: Option<u16>) -> Option<Uri> {
    // Strip the existing `:port` suffix, if any. User-info and bracketed
    // IPv6 hosts are left intact because the suffix sits after both.
    let full = authority.as_str();
    let host = match incoming.port() {
        Some(p) => &full[..full.len() - p.as_str().len() - 1],
        None => full,
    };
    let authority: Authority = match port {
        Some(p) => format!("{host}:{p}").parse().ok()?,
        None => host.parse().ok()?,
    };

    let mut parts = incoming.clone().into_parts();
    parts.scheme = Some(scheme);
    parts.authority = Some(authority);
    Uri::from_parts(parts).ok()
}
