//! End-to-end tests for the forwarded-URI rewrite pipeline.

use axum::body::Body;
use axum::http::Request;
use serde_json::Value;
use tower::ServiceExt;

use forwarded_rewrite::config::{ProxyConfig, UpstreamConfig};
use forwarded_rewrite::http::app;

mod common;

/// Drive the echo-mode router with one request and return the JSON body.
async fn echo(req: Request<Body>) -> Value {
    let router = app(&ProxyConfig::default());
    let response = router.oneshot(req).await.unwrap();
    assert!(response.status().is_success());
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).header("host", "happy.com");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn handler_sees_scheme_upgrade_with_explicit_port() {
    let body = echo(request(
        "http://happy.com/happy/path?happy=birthday&to=you",
        &[("x-forwarded-proto", "https")],
    ))
    .await;
    // Port 80 was inherited from the observed scheme and is not the https
    // default, so it stays explicit.
    assert_eq!(
        body["uri"],
        "https://happy.com:80/happy/path?happy=birthday&to=you"
    );
    assert_eq!(body["scheme"], "https");
    assert_eq!(body["port"], 80);
}

#[tokio::test]
async fn handler_sees_elided_default_port() {
    let body = echo(request(
        "http://happy.com:8000/happy/path",
        &[("x-forwarded-port", "80")],
    ))
    .await;
    assert_eq!(body["uri"], "http://happy.com/happy/path");
    assert_eq!(body["port"], Value::Null);
}

#[tokio::test]
async fn handler_sees_downgrade() {
    let body = echo(request(
        "https://happy.com/happy/path",
        &[("x-forwarded-proto", "http"), ("x-forwarded-port", "8080")],
    ))
    .await;
    assert_eq!(body["uri"], "http://happy.com:8080/happy/path");
}

#[tokio::test]
async fn malformed_port_leaves_request_untouched() {
    let body = echo(request(
        "http://happy.com/happy/path",
        &[
            ("x-forwarded-proto", "https"),
            ("x-forwarded-port", "undecipherable!"),
        ],
    ))
    .await;
    assert_eq!(body["uri"], "http://happy.com/happy/path");
    assert_eq!(body["scheme"], "http");
}

#[tokio::test]
async fn origin_form_request_is_untouched() {
    let body = echo(request(
        "/happy/path",
        &[("x-forwarded-proto", "https"), ("x-forwarded-port", "443")],
    ))
    .await;
    assert_eq!(body["uri"], "/happy/path");
    assert_eq!(body["scheme"], Value::Null);
}

#[tokio::test]
async fn rewrite_can_be_disabled() {
    let mut config = ProxyConfig::default();
    config.rewrite.enabled = false;
    let router = app(&config);

    let response = router
        .oneshot(request(
            "http://happy.com/happy/path",
            &[("x-forwarded-proto", "https")],
        ))
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["uri"], "http://happy.com/happy/path");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let router = app(&ProxyConfig::default());
    let response = router
        .oneshot(request("http://happy.com/happy/path", &[]))
        .await
        .unwrap();
    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert!(id.is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn forward_mode_reaches_upstream() {
    let backend = common::start_mock_backend("Hello from upstream").await;

    let mut config = ProxyConfig::default();
    config.upstream = Some(UpstreamConfig {
        uri: format!("http://{backend}"),
    });
    let router = app(&config);

    let response = router
        .oneshot(request(
            "http://happy.com/hello",
            &[("x-forwarded-proto", "https")],
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Hello from upstream");
}
