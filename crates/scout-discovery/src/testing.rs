//! Mock collaborators and fixtures for unit tests.

use async_trait::async_trait;
use scout_types::{
	Candidate, CandidateSource, EnrichedRepository, EnrichmentSource, LanguageBreakdown,
	SourceError, SourceResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn candidate(id: u64, owner: &str, name: &str, description: &str) -> Candidate {
	Candidate {
		id,
		name: name.to_string(),
		full_name: format!("{}/{}", owner, name),
		owner: owner.to_string(),
		html_url: format!("https://github.com/{}/{}", owner, name),
		url: format!("https://api.github.com/repos/{}/{}", owner, name),
		languages_url: format!("https://api.github.com/repos/{}/{}/languages", owner, name),
		description: description.to_string(),
		fork: false,
	}
}

fn breakdown(entries: &[(&str, u64)]) -> LanguageBreakdown {
	entries
		.iter()
		.map(|(language, bytes)| (language.to_string(), *bytes))
		.collect()
}

/// Four repositories with distinct sizes, languages and licenses.
pub fn sample_repositories() -> Vec<EnrichedRepository> {
	vec![
		EnrichedRepository::new(
			candidate(11, "john_doe", "repo_one", "first sample repository"),
			breakdown(&[("Go", 10), ("Java", 50)]),
			"MIT".to_string(),
		),
		EnrichedRepository::new(
			candidate(12, "jane_doe", "repo_two", "api sample repository"),
			breakdown(&[("C#", 100), ("Java", 50)]),
			"GPL-3.0".to_string(),
		),
		EnrichedRepository::new(
			candidate(13, "alice_smith", "repo_three", "third sample repository"),
			breakdown(&[("Javascript", 1000)]),
			"AGPL-3.0".to_string(),
		),
		EnrichedRepository::new(
			candidate(14, "bob_jones", "repo_four", "fourth sample repository"),
			breakdown(&[("C++", 10000)]),
			"BSD-2".to_string(),
		),
	]
}

/// How the mock answers `list_repositories`.
pub enum Listing {
	/// Every candidate with an id above the cursor
	Feed(Vec<Candidate>),
	/// Batches keyed by `since`; unknown keys yield an empty batch
	Paged(HashMap<u64, Vec<Candidate>>),
	Fail,
}

/// In-memory platform implementing both collaborator traits.
pub struct MockPlatform {
	pub latest_id: SourceResult<u64>,
	pub listing: Listing,
	pub languages: HashMap<String, LanguageBreakdown>,
	pub licenses: HashMap<String, String>,
	pub fail_languages: bool,
	pub fail_licenses: bool,
	pub enrichment_delay: Option<Duration>,
	pub list_calls: Mutex<Vec<u64>>,
	pub enrichment_calls: AtomicUsize,
	in_flight: AtomicUsize,
	pub max_in_flight: AtomicUsize,
}

impl MockPlatform {
	/// Platform serving the sample repositories, created right after id 10.
	pub fn samples() -> Self {
		let repos = sample_repositories();
		let mut platform = Self::with_listing(
			10,
			Listing::Feed(repos.iter().map(|r| r.candidate.clone()).collect()),
		);
		for repo in repos {
			platform.register(&repo);
		}
		platform
	}

	pub fn with_listing(latest_id: u64, listing: Listing) -> Self {
		Self {
			latest_id: Ok(latest_id),
			listing,
			languages: HashMap::new(),
			licenses: HashMap::new(),
			fail_languages: false,
			fail_licenses: false,
			enrichment_delay: None,
			list_calls: Mutex::new(Vec::new()),
			enrichment_calls: AtomicUsize::new(0),
			in_flight: AtomicUsize::new(0),
			max_in_flight: AtomicUsize::new(0),
		}
	}

	pub fn register(&mut self, repo: &EnrichedRepository) {
		self.languages
			.insert(repo.candidate.languages_url.clone(), repo.languages.clone());
		self.licenses
			.insert(repo.candidate.url.clone(), repo.license.clone());
	}

	pub fn list_calls(&self) -> Vec<u64> {
		self.list_calls.lock().unwrap().clone()
	}

	async fn track<T>(&self, value: T) -> T {
		self.enrichment_calls.fetch_add(1, Ordering::SeqCst);
		let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_in_flight.fetch_max(now, Ordering::SeqCst);
		if let Some(delay) = self.enrichment_delay {
			tokio::time::sleep(delay).await;
		}
		self.in_flight.fetch_sub(1, Ordering::SeqCst);
		value
	}
}

#[async_trait]
impl CandidateSource for MockPlatform {
	async fn latest_repository_id(&self) -> SourceResult<u64> {
		match &self.latest_id {
			Ok(id) => Ok(*id),
			Err(e) => Err(SourceError::Network(e.to_string())),
		}
	}

	async fn list_repositories(&self, since: u64) -> SourceResult<Vec<Candidate>> {
		self.list_calls.lock().unwrap().push(since);
		match &self.listing {
			Listing::Feed(candidates) => Ok(candidates
				.iter()
				.filter(|c| c.id > since)
				.cloned()
				.collect()),
			Listing::Paged(pages) => Ok(pages.get(&since).cloned().unwrap_or_default()),
			Listing::Fail => Err(SourceError::Status {
				status: 503,
				url: format!("https://api.github.com/repositories?since={}", since),
			}),
		}
	}
}

#[async_trait]
impl EnrichmentSource for MockPlatform {
	async fn languages(&self, candidate: &Candidate) -> SourceResult<LanguageBreakdown> {
		let result = if self.fail_languages {
			Err(SourceError::Network("connection reset".to_string()))
		} else {
			Ok(self
				.languages
				.get(&candidate.languages_url)
				.cloned()
				.unwrap_or_default())
		};
		self.track(result).await
	}

	async fn license(&self, candidate: &Candidate) -> SourceResult<String> {
		let result = if self.fail_licenses {
			Err(SourceError::Decode("unexpected body".to_string()))
		} else {
			Ok(self.licenses.get(&candidate.url).cloned().unwrap_or_default())
		};
		self.track(result).await
	}
}
