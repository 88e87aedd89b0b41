//! Discovery loop.
//!
//! Starting from the most recent creation event, the loop requests a batch of
//! candidates at the cursor, enriches and filters it, and collects accepted
//! repositories until the target count is met. Fatal upstream failures abort
//! the whole run.

use scout_types::{CandidateSource, Criteria, DiscoveryConfig, EnrichedRepository, EnrichmentSource};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::cursor::CursorTracker;
use crate::enricher::BatchEnricher;
use crate::error::DiscoveryError;

/// Why a discovery run stopped collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	/// The target count was reached
	QuotaMet,
	/// Upstream returned an empty batch.
	///
	/// Forks are dropped by the source before the batch reaches the loop, so
	/// a page made only of forks also ends the run here.
	Exhausted,
	/// A batch did not move the cursor past the id it was requested with
	NoProgress,
	/// The configured maximum number of batches was fetched
	BatchLimit,
}

impl fmt::Display for StopReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let reason = match self {
			StopReason::QuotaMet => "quota met",
			StopReason::Exhausted => "upstream exhausted",
			StopReason::NoProgress => "cursor did not advance",
			StopReason::BatchLimit => "batch limit reached",
		};
		f.write_str(reason)
	}
}

/// Batch discovery engine.
pub struct RepositoryDiscovery {
	candidates: Arc<dyn CandidateSource>,
	enricher: BatchEnricher,
	config: DiscoveryConfig,
}

impl RepositoryDiscovery {
	pub fn new(
		candidates: Arc<dyn CandidateSource>,
		enrichment: Arc<dyn EnrichmentSource>,
		config: DiscoveryConfig,
	) -> Self {
		let enricher = BatchEnricher::new(enrichment, config.max_concurrent_enrichments);
		Self {
			candidates,
			enricher,
			config,
		}
	}

	pub fn config(&self) -> &DiscoveryConfig {
		&self.config
	}

	/// Collects at most `target` repositories matching `criteria`.
	///
	/// Results are ordered batch by batch, oldest cursor first; order within a
	/// batch is unspecified. Fewer than `target` results are returned only when
	/// upstream runs dry or the batch limit is hit. Cancelling `cancel`, or
	/// dropping the returned future, stops new enrichment calls from starting.
	#[instrument(skip(self, criteria, cancel))]
	pub async fn discover(
		&self,
		criteria: &Criteria,
		target: usize,
		cancel: CancellationToken,
	) -> Result<Vec<EnrichedRepository>, DiscoveryError> {
		if target == 0 {
			return Ok(Vec::new());
		}

		let cancel = cancel.child_token();
		let _cancel_on_drop = cancel.clone().drop_guard();

		let start = self
			.candidates
			.latest_repository_id()
			.await
			.map_err(DiscoveryError::LatestId)?;
		if start == 0 {
			return Err(DiscoveryError::NoStartingPoint);
		}
		debug!(start, "Found latest repository id");

		let cursor = Arc::new(CursorTracker::new(start));
		let criteria = Arc::new(criteria.clone());
		let mut output = Vec::with_capacity(target);
		let mut batches = 0usize;

		let reason = loop {
			if cancel.is_cancelled() {
				return Err(DiscoveryError::Cancelled);
			}
			if self.config.max_batches > 0 && batches >= self.config.max_batches {
				break StopReason::BatchLimit;
			}

			let since = cursor.snapshot().await;
			let mut batch = self
				.candidates
				.list_repositories(since)
				.await
				.map_err(|source| DiscoveryError::Listing { since, source })?;
			batches += 1;

			if batch.is_empty() {
				break StopReason::Exhausted;
			}
			batch.truncate(self.config.batch_size.max(1));
			let fetched = batch.len();

			let mut handle =
				self.enricher
					.enrich(batch, criteria.clone(), cursor.clone(), cancel.clone());
			while let Some(repo) = handle.next().await {
				output.push(repo);
				if output.len() >= target {
					cancel.cancel();
					break;
				}
			}
			let outcome = handle.join().await;
			let state = cursor.complete_batch(since).await;

			info!(
				batch = batches,
				since,
				next = state.id,
				fetched,
				accepted = outcome.accepted,
				collected = output.len(),
				remaining = target - output.len(),
				enrichment_failures = outcome.enrichment_failures,
				"Processed batch"
			);

			if output.len() >= target {
				break StopReason::QuotaMet;
			}
			// skipped tasks leave the cursor untouched, so check before the progress guard
			if cancel.is_cancelled() {
				return Err(DiscoveryError::Cancelled);
			}
			if state.id <= since {
				break StopReason::NoProgress;
			}
		};

		info!(
			%reason,
			batches,
			collected = output.len(),
			target,
			"Discovery finished"
		);
		Ok(output)
	}
}
