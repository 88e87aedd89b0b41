//! API types for the repo-scout HTTP API.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::criteria::Criteria;
use crate::errors::CriteriaError;
use crate::repository::{EnrichedRepository, LanguageBreakdown};

/// Body of `GET /repositories`.
///
/// Every field is optional; unknown fields are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_size_bounds"))]
pub struct ListRepositoriesRequest {
	/// Substring of one of the repository languages
	#[serde(default)]
	pub language: Option<String>,
	/// Substring of the SPDX license identifier
	#[serde(default)]
	pub license: Option<String>,
	#[serde(default)]
	pub name_contains: Option<String>,
	#[serde(default)]
	pub description_contains: Option<String>,
	/// Exclusive lower size bound in bytes, 0 for none
	#[serde(default)]
	#[validate(range(min = 0))]
	pub min_size: i64,
	/// Exclusive upper size bound in bytes, 0 for none
	#[serde(default)]
	#[validate(range(min = 0))]
	pub max_size: i64,
}

fn validate_size_bounds(request: &ListRepositoriesRequest) -> Result<(), ValidationError> {
	if request.min_size > 0 && request.max_size > 0 && request.min_size >= request.max_size {
		let mut err = ValidationError::new("size_bounds");
		err.message = Some(Cow::from(
			"max can't be less than min, min and max must be positive and different",
		));
		return Err(err);
	}
	Ok(())
}

impl ListRepositoriesRequest {
	pub fn into_criteria(self) -> Result<Criteria, CriteriaError> {
		let mut builder = Criteria::builder()
			.min_size(self.min_size)
			.max_size(self.max_size);
		if let Some(language) = self.language {
			builder = builder.language(language);
		}
		if let Some(license) = self.license {
			builder = builder.license(license);
		}
		if let Some(name) = self.name_contains {
			builder = builder.name_contains(name);
		}
		if let Some(description) = self.description_contains {
			builder = builder.description_contains(description);
		}
		builder.build()
	}
}

/// One entry of the `GET /repositories` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOutput {
	pub full_name: String,
	pub owner: String,
	/// Browser URL of the repository
	pub repository: String,
	pub license: String,
	pub description: String,
	pub languages: LanguageBreakdown,
}

impl From<EnrichedRepository> for RepositoryOutput {
	fn from(repo: EnrichedRepository) -> Self {
		Self {
			full_name: repo.candidate.full_name,
			owner: repo.candidate.owner,
			repository: repo.candidate.html_url,
			license: repo.license,
			description: repo.candidate.description,
			languages: repo.languages,
		}
	}
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub message: String,
}
