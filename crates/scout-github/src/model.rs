//! Wire shapes of the GitHub REST API responses.
//!
//! Only the fields repo-scout reads are declared; everything else in the
//! payloads is ignored.

use scout_types::Candidate;
use serde::Deserialize;

/// Entry of `GET /events`.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
	#[serde(rename = "type")]
	pub kind: String,
	pub repo: Option<EventRepo>,
	pub payload: Option<EventPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepo {
	pub id: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
	pub ref_type: Option<String>,
}

impl Event {
	/// Repository id when the event records the creation of a repository.
	pub fn created_repository_id(&self) -> Option<u64> {
		let is_repository = self
			.payload
			.as_ref()
			.and_then(|payload| payload.ref_type.as_deref())
			== Some("repository");

		if self.kind == "CreateEvent" && is_repository {
			self.repo.as_ref().map(|repo| repo.id)
		} else {
			None
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
	pub login: String,
}

/// Entry of `GET /repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
	pub id: u64,
	pub name: String,
	pub full_name: String,
	pub owner: Owner,
	pub html_url: String,
	pub url: String,
	pub languages_url: String,
	pub description: Option<String>,
	#[serde(default)]
	pub fork: bool,
}

impl From<Repository> for Candidate {
	fn from(repo: Repository) -> Self {
		Candidate {
			id: repo.id,
			name: repo.name,
			full_name: repo.full_name,
			owner: repo.owner.login,
			html_url: repo.html_url,
			url: repo.url,
			languages_url: repo.languages_url,
			description: repo.description.unwrap_or_default(),
			fork: repo.fork,
		}
	}
}

/// `GET /repos/{owner}/{repo}`, reduced to its license.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryLicense {
	pub license: Option<License>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct License {
	pub spdx_id: Option<String>,
}

impl RepositoryLicense {
	pub fn spdx_id(self) -> String {
		self.license
			.and_then(|license| license.spdx_id)
			.unwrap_or_default()
	}
}
