// scout-discovery/src/error.rs

use scout_types::SourceError;
use thiserror::Error;

/// Fatal discovery failures. No partial results accompany them.
#[derive(Error, Debug)]
pub enum DiscoveryError {
	#[error("Error while getting latest repository id: {0}")]
	LatestId(#[source] SourceError),

	#[error("Latest repository id is zero, nothing to start from")]
	NoStartingPoint,

	#[error("Error while getting repositories since {since}: {source}")]
	Listing {
		since: u64,
		#[source]
		source: SourceError,
	},

	#[error("Discovery cancelled")]
	Cancelled,
}
