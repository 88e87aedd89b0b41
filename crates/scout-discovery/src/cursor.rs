//! Pagination cursor shared between the discovery loop and its enrichment
//! tasks.

use tokio::sync::Mutex;

/// Copy of the cursor registers at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
	/// Watermark to request the next batch with
	pub id: u64,
	/// Watermark the last completed batch was requested with
	pub last_processed: u64,
}

/// Mutex-guarded pagination watermark.
///
/// `id` only moves forward: every enrichment task offers its candidate id and
/// the highest one wins, whatever the interleaving.
#[derive(Debug)]
pub struct CursorTracker {
	state: Mutex<CursorState>,
}

impl CursorTracker {
	pub fn new(start: u64) -> Self {
		Self {
			state: Mutex::new(CursorState {
				id: start,
				last_processed: start,
			}),
		}
	}

	/// Moves the watermark to `candidate_id` if it is higher.
	///
	/// Returns whether the watermark moved.
	pub async fn advance(&self, candidate_id: u64) -> bool {
		let mut state = self.state.lock().await;
		if candidate_id > state.id {
			state.id = candidate_id;
			true
		} else {
			false
		}
	}

	/// Current watermark.
	pub async fn snapshot(&self) -> u64 {
		self.state.lock().await.id
	}

	/// Records that the batch requested at `since` is fully joined.
	pub async fn complete_batch(&self, since: u64) -> CursorState {
		let mut state = self.state.lock().await;
		state.last_processed = since;
		*state
	}

	pub async fn state(&self) -> CursorState {
		*self.state.lock().await
	}
}
