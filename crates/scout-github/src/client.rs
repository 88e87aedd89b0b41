//! HTTP client for the GitHub REST API.

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{redirect, Response, StatusCode, Url};
use scout_types::{
	Candidate, CandidateSource, EnrichmentSource, GitHubConfig, LanguageBreakdown, SourceError,
	SourceResult,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::model::{Event, Repository, RepositoryLicense};

const API_VERSION_HEADER: &str = "x-github-api-version";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// GitHub REST API client implementing [`CandidateSource`] and
/// [`EnrichmentSource`].
///
/// Redirects are not followed: a moved repository is reported by GitHub with
/// a 301 and treated like a missing one during enrichment.
#[derive(Debug, Clone)]
pub struct GitHubClient {
	http: reqwest::Client,
	base_url: Url,
	latest_id_retries: u32,
	retry_interval: Duration,
}

impl GitHubClient {
	pub fn new(config: &GitHubConfig) -> SourceResult<Self> {
		let mut api_url = config.api_url.clone();
		if !api_url.ends_with('/') {
			api_url.push('/');
		}
		let base_url = Url::parse(&api_url)
			.map_err(|e| SourceError::Config(format!("Invalid api_url '{}': {}", config.api_url, e)))?;

		let mut headers = HeaderMap::new();
		headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
		if !config.api_version.is_empty() {
			let version = HeaderValue::from_str(&config.api_version)
				.map_err(|e| SourceError::Config(format!("Invalid api_version: {}", e)))?;
			headers.insert(HeaderName::from_static(API_VERSION_HEADER), version);
		}
		if config.use_credentials {
			let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
				.map_err(|e| SourceError::Config(format!("Invalid token: {}", e)))?;
			bearer.set_sensitive(true);
			headers.insert(AUTHORIZATION, bearer);
		}

		let http = reqwest::Client::builder()
			.user_agent(config.user_agent.clone())
			.default_headers(headers)
			.timeout(Duration::from_millis(config.timeout_ms))
			.redirect(redirect::Policy::none())
			.build()
			.map_err(|e| SourceError::Config(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			http,
			base_url,
			latest_id_retries: config.latest_id_retries.max(1),
			retry_interval: Duration::from_millis(config.retry_interval_ms),
		})
	}

	fn endpoint(&self, path: &str) -> SourceResult<Url> {
		self.base_url
			.join(path)
			.map_err(|e| SourceError::Config(format!("Invalid endpoint '{}': {}", path, e)))
	}

	async fn send(&self, url: &str) -> SourceResult<Response> {
		self.http
			.get(url)
			.send()
			.await
			.map_err(|e| SourceError::Network(format!("GET {} failed: {}", url, e)))
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
		let response = self.send(url).await?;
		decode(response, url).await
	}

	fn backoff(&self) -> ExponentialBackoff {
		ExponentialBackoff {
			current_interval: self.retry_interval,
			initial_interval: self.retry_interval,
			max_elapsed_time: None,
			..Default::default()
		}
	}
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> SourceResult<T> {
	let status = response.status();
	if !status.is_success() {
		return Err(SourceError::Status {
			status: status.as_u16(),
			url: url.to_string(),
		});
	}
	response
		.json::<T>()
		.await
		.map_err(|e| SourceError::Decode(format!("{}: {}", url, e)))
}

fn is_missing(status: StatusCode) -> bool {
	status == StatusCode::NOT_FOUND || status == StatusCode::MOVED_PERMANENTLY
}

#[async_trait]
impl CandidateSource for GitHubClient {
	async fn latest_repository_id(&self) -> SourceResult<u64> {
		let url = self.endpoint("events")?;
		let mut backoff = self.backoff();

		for attempt in 1..=self.latest_id_retries {
			let events: Vec<Event> = self.get_json(url.as_str()).await?;
			if let Some(id) = events.iter().find_map(Event::created_repository_id) {
				debug!(id, attempt, "Found repository creation event");
				return Ok(id);
			}

			if attempt < self.latest_id_retries {
				let delay = backoff.next_backoff().unwrap_or(self.retry_interval);
				warn!(
					"No repository creation event, attempt {}/{}, retrying in {:?}",
					attempt, self.latest_id_retries, delay
				);
				tokio::time::sleep(delay).await;
			}
		}

		Err(SourceError::LatestIdNotFound {
			attempts: self.latest_id_retries,
		})
	}

	async fn list_repositories(&self, since: u64) -> SourceResult<Vec<Candidate>> {
		let mut url = self.endpoint("repositories")?;
		url.query_pairs_mut().append_pair("since", &since.to_string());

		let repositories: Vec<Repository> = self.get_json(url.as_str()).await?;
		let total = repositories.len();
		let candidates: Vec<Candidate> = repositories
			.into_iter()
			.filter(|repo| !repo.fork)
			.map(Candidate::from)
			.collect();

		debug!(since, total, forks = total - candidates.len(), "Listed repositories");
		Ok(candidates)
	}
}

#[async_trait]
impl EnrichmentSource for GitHubClient {
	async fn languages(&self, candidate: &Candidate) -> SourceResult<LanguageBreakdown> {
		let url = candidate.languages_url.as_str();
		let response = self.send(url).await?;
		if is_missing(response.status()) {
			warn!("Languages not found for {}, skipping", url);
			return Ok(LanguageBreakdown::new());
		}
		decode(response, url).await
	}

	async fn license(&self, candidate: &Candidate) -> SourceResult<String> {
		let url = candidate.url.as_str();
		let response = self.send(url).await?;
		if is_missing(response.status()) {
			warn!("License not found for {}, skipping", url);
			return Ok(String::new());
		}
		let license: RepositoryLicense = decode(response, url).await?;
		Ok(license.spdx_id())
	}
}
