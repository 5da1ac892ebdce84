//! Tower middleware that installs the reconciled request URI.
//!
//! # Responsibilities
//! - Read `x-forwarded-proto` / `x-forwarded-port` from the request
//! - Replace the request URI only when reconciliation produced a change
//! - Pass everything else through untouched
//!
//! # Design Decisions
//! - Must sit before route matching: in axum any `Router::layer` wraps the
//!   matcher, so downstream routing already sees the corrected scheme/port
//! - Transparent service: same response, error and future types as the
//!   inner service, nothing buffered, nothing allocated on the no-op path

use std::task::{Context, Poll};

use axum::http::Request;
use tower::{Layer, Service};

use crate::rewrite::headers::{forwarded_value, X_FORWARDED_PORT, X_FORWARDED_PROTO};
use crate::rewrite::reconcile::reconcile;

/// Layer that applies [`ForwardedUri`] to the wrapped service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardedUriLayer;

impl<S> Layer<S> for ForwardedUriLayer {
    type Service = ForwardedUri<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ForwardedUri { inner }
    }
}

/// Middleware that rewrites the request URI to the client-facing
/// scheme/port reported by the edge load balancer.
#[derive(Debug, Clone, Copy)]
pub struct ForwardedUri<S> {
    inner: S,
}

impl<S> ForwardedUri<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Consumes the middleware, returning the wrapped service.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B> Service<Request<B>> for ForwardedUri<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let corrected = {
            let proto = forwarded_value(req.headers(), X_FORWARDED_PROTO);
            let port = forwarded_value(req.headers(), X_FORWARDED_PORT);
            reconcile(req.uri(), proto, port)
        };
        if let Some(uri) = corrected {
            tracing::debug!(
                from = %req.uri(),
                to = %uri,
                "Rewrote request URI from forwarded headers"
            );
            *req.uri_mut() = uri;
        }
        self.inner.call(req)
    }
}
