//! Forwarded-URI rewrite subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → headers.rs (read x-forwarded-proto / x-forwarded-port)
//!     → reconcile.rs (compute corrected URI, or nothing)
//!     → layer.rs (install corrected URI into the request)
//!     → [route matching and everything downstream see the corrected URI]
//! ```

pub mod headers;
pub mod layer;
pub mod reconcile;

pub use headers::{X_FORWARDED_PORT, X_FORWARDED_PROTO};
pub use layer::{ForwardedUri, ForwardedUriLayer};
pub use reconcile::{reconcile, HttpScheme};
