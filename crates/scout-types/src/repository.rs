//! Discovered repository model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Byte size per language, as reported by the upstream platform.
pub type LanguageBreakdown = HashMap<String, u64>;

/// A newly created repository before enrichment.
///
/// Candidates live for a single batch. Sources drop forks before handing
/// candidates out, so `fork` is always false once a candidate reaches the
/// discovery engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
	pub id: u64,
	pub name: String,
	pub full_name: String,
	/// Owner login
	pub owner: String,
	/// Browser URL of the repository
	pub html_url: String,
	/// API URL of the repository, also used to resolve its license
	pub url: String,
	pub languages_url: String,
	/// Empty when the repository has no description
	pub description: String,
	pub fork: bool,
}

/// A candidate with its secondary metadata resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRepository {
	pub candidate: Candidate,
	pub languages: LanguageBreakdown,
	/// SPDX identifier, empty when unknown
	pub license: String,
}

impl EnrichedRepository {
	pub fn new(candidate: Candidate, languages: LanguageBreakdown, license: String) -> Self {
		Self {
			candidate,
			languages,
			license,
		}
	}

	/// Total size in bytes, derived from the language breakdown.
	pub fn size(&self) -> u64 {
		self.languages
			.values()
			.fold(0u64, |total, bytes| total.saturating_add(*bytes))
	}
}
