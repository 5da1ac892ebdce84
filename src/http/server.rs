//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware
//! - Apply the forwarded-URI rewrite before any route matching
//! - Echo mode: report the URI the handler observed (for inspection)
//! - Forward mode: proxy requests to the configured upstream
//!
//! # Design Decisions
//! - The rewrite layer wraps the router, so route matching and every
//!   handler already see the corrected scheme/port
//! - Upstream transport failures map to 502, never to a panic

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, X_REQUEST_ID};
use crate::rewrite::ForwardedUriLayer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Option<Arc<Uri>>,
}

/// HTTP server hosting the forwarded-URI rewrite.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let router = app(&config);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rewrite_enabled = self.config.rewrite.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// The forwarded-URI layer wraps the router itself, which in Axum means it
/// runs before route matching; anything that dispatches on scheme or port
/// must stay inside it.
pub fn app(config: &ProxyConfig) -> Router {
    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    let upstream = config
        .upstream
        .as_ref()
        .and_then(|u| u.uri.parse::<Uri>().ok())
        .map(Arc::new);

    let state = AppState { client, upstream };

    let router = Router::new()
        .route("/{*path}", any(proxy_handler))
        .route("/", any(proxy_handler))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )));

    let router = if config.rewrite.enabled {
        router.layer(ForwardedUriLayer)
    } else {
        router
    };

    router
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
        .layer(TraceLayer::new_for_http())
}

/// Echo-mode response describing the request as the handler observed it.
#[derive(Debug, Serialize)]
struct EchoResponse {
    method: String,
    uri: String,
    scheme: Option<String>,
    port: Option<u16>,
    request_id: Option<String>,
}

/// Main handler: forward to the upstream when one is configured, report
/// the observed URI otherwise.
async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> impl IntoResponse {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    tracing::debug!(
        request_id = request_id.as_deref().unwrap_or("unknown"),
        method = %request.method(),
        uri = %request.uri(),
        "Handling request"
    );

    match state.upstream.as_deref() {
        Some(upstream) => forward(&state, upstream, request).await,
        None => {
            let echo = EchoResponse {
                method: request.method().to_string(),
                uri: request.uri().to_string(),
                scheme: request.uri().scheme_str().map(str::to_string),
                port: request.uri().port_u16(),
                request_id,
            };
            Json(echo).into_response()
        }
    }
}

/// Forward the request to the upstream, swapping in its scheme/authority.
async fn forward(state: &AppState, upstream: &Uri, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = upstream.scheme().cloned();
    uri_parts.authority = upstream.authority().cloned();
    match Uri::from_parts(uri_parts) {
        Ok(uri) => parts.uri = uri,
        Err(e) => {
            tracing::warn!(error = %e, "Could not target upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream target").into_response();
        }
    }

    let outbound = Request::from_parts(parts, body);
    match state.client.request(outbound).await {
        Ok(response) => {
            let (parts, body): (_, Incoming) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream request failed");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
