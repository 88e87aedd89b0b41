//! Collaborator traits implemented by upstream platforms.

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::repository::{Candidate, LanguageBreakdown};

/// Lists newly created repositories.
#[async_trait]
pub trait CandidateSource: Send + Sync {
	/// Id of the most recently created repository.
	///
	/// The discovery engine treats an error or a zero id as fatal.
	async fn latest_repository_id(&self) -> SourceResult<u64>;

	/// Repositories created after `since`, forks excluded.
	async fn list_repositories(&self, since: u64) -> SourceResult<Vec<Candidate>>;
}

/// Resolves secondary metadata for one candidate.
///
/// A missing resource is not an error: implementations return an empty
/// breakdown or an empty license string instead.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
	async fn languages(&self, candidate: &Candidate) -> SourceResult<LanguageBreakdown>;

	/// SPDX identifier of the repository license.
	async fn license(&self, candidate: &Candidate) -> SourceResult<String>;
}
