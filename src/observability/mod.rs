//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; request ID flows through all events
//! - No metrics endpoint: this service's observability surface is its logs

pub mod logging;
