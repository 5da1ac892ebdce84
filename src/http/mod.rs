//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → rewrite layer (forwarded-URI reconciliation, pre-matching)
//!     → request.rs (request ID assignment/propagation)
//!     → handler (echo the observed URI, or forward upstream)
//! ```

pub mod request;
pub mod server;

pub use request::{propagate_request_id_layer, set_request_id_layer, UuidRequestId, X_REQUEST_ID};
pub use server::{app, AppState, HttpServer};
