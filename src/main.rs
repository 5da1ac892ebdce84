//! Forwarded-URI rewrite service.
//!
//! A small reverse-proxy component, built with Tokio and Axum, that sits
//! behind an edge load balancer and rewrites the request URI so downstream
//! logic sees the client-facing scheme and port.
//!
//! ```text
//!                        x-forwarded-proto: https
//!                        x-forwarded-port: 443
//! Client ──https──▶ edge LB ───http──▶ this service ──▶ upstream/echo
//!                                        │
//!                                        └─ request URI rewritten to
//!                                           https://host/... before routing
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use forwarded_rewrite::config::{load_config, ProxyConfig};
use forwarded_rewrite::http::HttpServer;
use forwarded_rewrite::observability::logging;

/// Rewrite request URIs from load balancer forwarding headers.
#[derive(Debug, Parser)]
#[command(name = "forwarded-rewrite", version)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address from the config.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(config.observability.log_filter.as_deref());

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rewrite_enabled = config.rewrite.enabled,
        upstream = config.upstream.as_ref().map(|u| u.uri.as_str()).unwrap_or("none (echo mode)"),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
