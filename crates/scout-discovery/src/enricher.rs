//! Batch enrichment.
//!
//! One task is spawned per candidate. Each task resolves the candidate's
//! languages and license, offers its id to the shared cursor, runs the
//! criteria filter and, when the candidate passes, sends it on the batch
//! result channel. A semaphore caps how many tasks talk to the upstream
//! platform at the same time.
//!
//! Every task owns a sender, so the result channel only closes once all
//! tasks of the batch have finished. The channel is sized to the batch, which
//! keeps senders from ever waiting on the consumer.

use scout_types::{Candidate, Criteria, EnrichedRepository, EnrichmentSource, LanguageBreakdown};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, trace, warn};

use crate::cursor::CursorTracker;
use crate::filter;

/// Tally of a fully joined batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
	/// Candidates that went through enrichment
	pub processed: usize,
	/// Candidates that passed the criteria
	pub accepted: usize,
	/// Candidates skipped because the batch was cancelled first
	pub skipped: usize,
	/// Languages or license lookups that failed and were replaced by empty values
	pub enrichment_failures: usize,
	/// Tasks that panicked
	pub panicked: usize,
}

enum TaskOutcome {
	Skipped,
	Enriched { accepted: bool, failures: usize },
}

/// Results of an in-progress batch.
pub struct BatchHandle {
	results: mpsc::Receiver<EnrichedRepository>,
	join: JoinHandle<BatchOutcome>,
}

impl BatchHandle {
	/// Next accepted repository, `None` once every task has finished.
	pub async fn next(&mut self) -> Option<EnrichedRepository> {
		self.results.recv().await
	}

	/// Waits for every task of the batch.
	///
	/// Results not yet received are discarded.
	pub async fn join(self) -> BatchOutcome {
		drop(self.results);
		match self.join.await {
			Ok(outcome) => outcome,
			Err(e) => {
				error!("Batch supervisor failed: {}", e);
				BatchOutcome::default()
			}
		}
	}
}

/// Fans enrichment out over a batch of candidates.
#[derive(Clone)]
pub struct BatchEnricher {
	source: Arc<dyn EnrichmentSource>,
	permits: Arc<Semaphore>,
}

impl BatchEnricher {
	pub fn new(source: Arc<dyn EnrichmentSource>, max_concurrent: usize) -> Self {
		Self {
			source,
			permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
		}
	}

	/// Spawns one enrichment task per candidate and returns a handle on
	/// the accepted repositories.
	///
	/// Cancelling `cancel` keeps tasks that have not started their upstream
	/// calls from starting them; calls already in flight run to completion.
	pub fn enrich(
		&self,
		batch: Vec<Candidate>,
		criteria: Arc<Criteria>,
		cursor: Arc<CursorTracker>,
		cancel: CancellationToken,
	) -> BatchHandle {
		let (tx, rx) = mpsc::channel(batch.len().max(1));
		let mut tasks = JoinSet::new();

		for candidate in batch {
			tasks.spawn(enrich_candidate(
				candidate,
				self.source.clone(),
				self.permits.clone(),
				criteria.clone(),
				cursor.clone(),
				tx.clone(),
				cancel.clone(),
			));
		}
		drop(tx);

		let join = tokio::spawn(async move {
			let mut outcome = BatchOutcome::default();
			while let Some(result) = tasks.join_next().await {
				match result {
					Ok(TaskOutcome::Skipped) => outcome.skipped += 1,
					Ok(TaskOutcome::Enriched { accepted, failures }) => {
						outcome.processed += 1;
						outcome.enrichment_failures += failures;
						if accepted {
							outcome.accepted += 1;
						}
					}
					Err(e) => {
						error!("Enrichment task failed: {}", e);
						outcome.panicked += 1;
					}
				}
			}
			outcome
		});

		BatchHandle { results: rx, join }
	}
}

async fn enrich_candidate(
	candidate: Candidate,
	source: Arc<dyn EnrichmentSource>,
	permits: Arc<Semaphore>,
	criteria: Arc<Criteria>,
	cursor: Arc<CursorTracker>,
	tx: mpsc::Sender<EnrichedRepository>,
	cancel: CancellationToken,
) -> TaskOutcome {
	let _permit = tokio::select! {
		biased;
		_ = cancel.cancelled() => {
			trace!(id = candidate.id, "Batch cancelled, skipping candidate");
			return TaskOutcome::Skipped;
		}
		permit = permits.acquire_owned() => match permit {
			Ok(permit) => permit,
			Err(_) => return TaskOutcome::Skipped,
		},
	};

	let mut failures = 0;

	let languages = match source.languages(&candidate).await {
		Ok(languages) => languages,
		Err(e) => {
			warn!(repository = %candidate.full_name, error = %e, "Couldn't retrieve languages");
			failures += 1;
			LanguageBreakdown::new()
		}
	};

	let license = match source.license(&candidate).await {
		Ok(license) => license,
		Err(e) => {
			warn!(repository = %candidate.full_name, error = %e, "Couldn't retrieve license");
			failures += 1;
			String::new()
		}
	};

	cursor.advance(candidate.id).await;

	let repo = EnrichedRepository::new(candidate, languages, license);
	let accepted = filter::matches(&criteria, &repo);
	if accepted && tx.send(repo).await.is_err() {
		trace!("Result receiver dropped");
	}

	TaskOutcome::Enriched { accepted, failures }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{candidate, MockPlatform};
	use std::sync::atomic::Ordering;
	use std::time::Duration;

	fn sample_batch() -> Vec<Candidate> {
		crate::testing::sample_repositories()
			.into_iter()
			.map(|r| r.candidate)
			.collect()
	}

	async fn drain(mut handle: BatchHandle) -> (Vec<EnrichedRepository>, BatchOutcome) {
		let mut results = Vec::new();
		while let Some(repo) = handle.next().await {
			results.push(repo);
		}
		(results, handle.join().await)
	}

	#[tokio::test]
	async fn test_enqueues_exactly_the_passing_subset() {
		let platform = Arc::new(MockPlatform::samples());
		let enricher = BatchEnricher::new(platform.clone(), 8);
		let cursor = Arc::new(CursorTracker::new(1));
		let criteria = Arc::new(Criteria::builder().min_size(10).max_size(500).build().unwrap());

		let handle = enricher.enrich(
			sample_batch(),
			criteria,
			cursor.clone(),
			CancellationToken::new(),
		);
		let (results, outcome) = drain(handle).await;

		let mut names: Vec<_> = results.iter().map(|r| r.candidate.name.clone()).collect();
		names.sort();
		assert_eq!(names, vec!["repo_one", "repo_two"]);
		assert_eq!(
			outcome,
			BatchOutcome {
				processed: 4,
				accepted: 2,
				skipped: 0,
				enrichment_failures: 0,
				panicked: 0,
			}
		);
		assert_eq!(cursor.snapshot().await, 14);
	}

	#[tokio::test]
	async fn test_enriched_values_come_from_source() {
		let platform = Arc::new(MockPlatform::samples());
		let enricher = BatchEnricher::new(platform, 8);
		let criteria = Arc::new(Criteria::builder().license("mit").build().unwrap());

		let handle = enricher.enrich(
			sample_batch(),
			criteria,
			Arc::new(CursorTracker::new(1)),
			CancellationToken::new(),
		);
		let (results, _) = drain(handle).await;

		assert_eq!(results.len(), 1);
		assert_eq!(results[0].license, "MIT");
		assert_eq!(results[0].size(), 60);
	}

	#[tokio::test]
	async fn test_enrichment_failures_degrade_to_empty_values() {
		let mut platform = MockPlatform::samples();
		platform.fail_languages = true;
		platform.fail_licenses = true;
		let enricher = BatchEnricher::new(Arc::new(platform), 8);

		let handle = enricher.enrich(
			sample_batch(),
			Arc::new(Criteria::any()),
			Arc::new(CursorTracker::new(1)),
			CancellationToken::new(),
		);
		let (results, outcome) = drain(handle).await;

		assert_eq!(results.len(), 4);
		assert!(results
			.iter()
			.all(|r| r.languages.is_empty() && r.license.is_empty()));
		assert_eq!(outcome.enrichment_failures, 8);
	}

	#[tokio::test]
	async fn test_cancelled_batch_skips_upstream_calls() {
		let platform = Arc::new(MockPlatform::samples());
		let enricher = BatchEnricher::new(platform.clone(), 8);
		let cursor = Arc::new(CursorTracker::new(1));
		let cancel = CancellationToken::new();
		cancel.cancel();

		let handle = enricher.enrich(sample_batch(), Arc::new(Criteria::any()), cursor.clone(), cancel);
		let (results, outcome) = drain(handle).await;

		assert!(results.is_empty());
		assert_eq!(outcome.skipped, 4);
		assert_eq!(platform.enrichment_calls.load(Ordering::SeqCst), 0);
		assert_eq!(cursor.snapshot().await, 1);
	}

	#[tokio::test]
	async fn test_concurrency_is_bounded() {
		let mut platform = MockPlatform::with_listing(1, crate::testing::Listing::Feed(vec![]));
		platform.enrichment_delay = Some(Duration::from_millis(20));
		let platform = Arc::new(platform);
		let enricher = BatchEnricher::new(platform.clone(), 2);

		let batch: Vec<_> = (1..=8)
			.map(|id| candidate(id, "owner", &format!("repo_{}", id), ""))
			.collect();
		let handle = enricher.enrich(
			batch,
			Arc::new(Criteria::any()),
			Arc::new(CursorTracker::new(0)),
			CancellationToken::new(),
		);
		let (results, outcome) = drain(handle).await;

		assert_eq!(results.len(), 8);
		assert_eq!(outcome.processed, 8);
		assert!(platform.max_in_flight.load(Ordering::SeqCst) <= 2);
	}

	#[tokio::test]
	async fn test_empty_batch_closes_immediately() {
		let enricher = BatchEnricher::new(Arc::new(MockPlatform::samples()), 4);
		let handle = enricher.enrich(
			Vec::new(),
			Arc::new(Criteria::any()),
			Arc::new(CursorTracker::new(1)),
			CancellationToken::new(),
		);
		let (results, outcome) = drain(handle).await;
		assert!(results.is_empty());
		assert_eq!(outcome, BatchOutcome::default());
	}
}
