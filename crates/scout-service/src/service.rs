//! Discovery service shared by the HTTP handlers.

use scout_discovery::RepositoryDiscovery;
use scout_github::GitHubClient;
use scout_types::{ListRepositoriesRequest, RepositoryOutput, ScoutConfig, SourceError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::ApiError;

pub struct ScoutService {
	discovery: RepositoryDiscovery,
	target: usize,
	request_timeout: Duration,
	shutdown: CancellationToken,
}

impl ScoutService {
	pub fn new(
		discovery: RepositoryDiscovery,
		request_timeout: Duration,
		shutdown: CancellationToken,
	) -> Self {
		let target = discovery.config().output_size;
		Self {
			discovery,
			target,
			request_timeout,
			shutdown,
		}
	}

	/// Builds the service against the GitHub API described by `config`.
	pub fn from_config(config: &ScoutConfig, shutdown: CancellationToken) -> Result<Self, SourceError> {
		let github = Arc::new(GitHubClient::new(&config.github)?);
		let discovery = RepositoryDiscovery::new(github.clone(), github, config.discovery.clone());

		info!(
			api_url = %config.github.api_url,
			output_size = config.discovery.output_size,
			batch_size = config.discovery.batch_size,
			"Discovery service ready"
		);

		Ok(Self::new(
			discovery,
			Duration::from_secs(config.service.request_timeout_secs),
			shutdown,
		))
	}

	#[instrument(skip_all)]
	pub async fn list_repositories(
		&self,
		request: ListRepositoriesRequest,
	) -> Result<Vec<RepositoryOutput>, ApiError> {
		request
			.validate()
			.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
		let criteria = request
			.into_criteria()
			.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

		let discovery =
			self.discovery
				.discover(&criteria, self.target, self.shutdown.child_token());
		let repositories = tokio::time::timeout(self.request_timeout, discovery)
			.await
			.map_err(|_| ApiError::Timeout(self.request_timeout))??;

		Ok(repositories.into_iter().map(RepositoryOutput::from).collect())
	}
}
