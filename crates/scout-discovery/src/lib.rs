//! # Repository Discovery Engine
//!
//! Finds newly created repositories, enriches them with their language
//! breakdown and license, and keeps the ones matching caller criteria.
//!
//! ## Key Components
//!
//! - [`CursorTracker`] - pagination watermark shared by enrichment tasks
//! - [`filter::matches`] - pure criteria filter
//! - [`BatchEnricher`] - bounded fan-out of enrichment tasks with fan-in
//!   through a result channel
//! - [`RepositoryDiscovery`] - the batch loop driving everything until the
//!   requested number of repositories is collected or upstream runs dry

pub mod cursor;
pub mod engine;
pub mod enricher;
pub mod error;
pub mod filter;

#[cfg(test)]
pub(crate) mod testing;

pub use cursor::{CursorState, CursorTracker};
pub use engine::{RepositoryDiscovery, StopReason};
pub use enricher::{BatchEnricher, BatchHandle, BatchOutcome};
pub use error::DiscoveryError;
