//! Shared types for repo-scout.
//!
//! This crate holds everything the other crates agree on: the discovered
//! repository model, the caller's filter criteria, the collaborator traits
//! implemented by upstream sources, configuration structures and the HTTP
//! API request/response shapes.

pub mod api;
pub mod configs;
pub mod criteria;
pub mod errors;
pub mod repository;
pub mod source;

pub use api::*;
pub use configs::*;
pub use criteria::*;
pub use errors::*;
pub use repository::*;
pub use source::*;
