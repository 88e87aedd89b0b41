//! repo-scout service.
//!
//! Exposes repository discovery over HTTP: `GET /repositories` runs a
//! discovery round against GitHub with the criteria in the request body and
//! `GET /health` reports liveness.

pub mod api;
pub mod error;
pub mod service;
