//! Error types shared across repo-scout crates.

use thiserror::Error;

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors raised by upstream collaborators (candidate and enrichment sources).
#[derive(Error, Debug)]
pub enum SourceError {
	#[error("Network error: {0}")]
	Network(String),

	#[error("Unexpected status {status} from {url}")]
	Status { status: u16, url: String },

	#[error("Decode error: {0}")]
	Decode(String),

	#[error("Couldn't find latest repository id after {attempts} attempts")]
	LatestIdNotFound { attempts: u32 },

	#[error("Configuration error: {0}")]
	Config(String),
}

/// Errors raised while building [`crate::Criteria`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
	#[error("{field} must be non-negative, got {value}")]
	NegativeSize { field: &'static str, value: i64 },

	#[error("min_size ({min}) must be lower than max_size ({max})")]
	InvertedSizeRange { min: u64, max: u64 },
}
