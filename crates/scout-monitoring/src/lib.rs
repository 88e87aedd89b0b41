//! Observability for repo-scout.
//!
//! Sets up the global `tracing` subscriber used by the service binary. Log
//! lines are either human-readable or JSON, filtered by `RUST_LOG` when set
//! and by the configured level otherwise.

pub mod tracing;

pub use crate::tracing::{init_tracing, TracingConfig};
