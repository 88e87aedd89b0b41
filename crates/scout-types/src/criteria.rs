//! Caller-supplied filter criteria.

use crate::errors::CriteriaError;

/// Validated, immutable filter criteria.
///
/// Substring criteria are stored lower-cased so matching can be done
/// case-insensitively without re-lowering the needle for every candidate.
/// Size bounds are exclusive; an unset bound is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
	language: Option<String>,
	license: Option<String>,
	name_contains: Option<String>,
	description_contains: Option<String>,
	min_size: Option<u64>,
	max_size: Option<u64>,
}

impl Criteria {
	/// Criteria that accept every candidate.
	pub fn any() -> Self {
		Self::default()
	}

	pub fn builder() -> CriteriaBuilder {
		CriteriaBuilder::default()
	}

	pub fn language(&self) -> Option<&str> {
		self.language.as_deref()
	}

	pub fn license(&self) -> Option<&str> {
		self.license.as_deref()
	}

	pub fn name_contains(&self) -> Option<&str> {
		self.name_contains.as_deref()
	}

	pub fn description_contains(&self) -> Option<&str> {
		self.description_contains.as_deref()
	}

	pub fn min_size(&self) -> Option<u64> {
		self.min_size
	}

	pub fn max_size(&self) -> Option<u64> {
		self.max_size
	}

	/// True when no criterion is configured.
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}

/// Builder for [`Criteria`].
///
/// Empty strings and zero sizes leave the criterion unset.
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
	language: Option<String>,
	license: Option<String>,
	name_contains: Option<String>,
	description_contains: Option<String>,
	min_size: i64,
	max_size: i64,
}

impl CriteriaBuilder {
	pub fn language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	pub fn license(mut self, license: impl Into<String>) -> Self {
		self.license = Some(license.into());
		self
	}

	pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
		self.name_contains = Some(needle.into());
		self
	}

	pub fn description_contains(mut self, needle: impl Into<String>) -> Self {
		self.description_contains = Some(needle.into());
		self
	}

	pub fn min_size(mut self, min_size: i64) -> Self {
		self.min_size = min_size;
		self
	}

	pub fn max_size(mut self, max_size: i64) -> Self {
		self.max_size = max_size;
		self
	}

	pub fn build(self) -> Result<Criteria, CriteriaError> {
		let min_size = size_bound("min_size", self.min_size)?;
		let max_size = size_bound("max_size", self.max_size)?;

		if let (Some(min), Some(max)) = (min_size, max_size) {
			if min >= max {
				return Err(CriteriaError::InvertedSizeRange { min, max });
			}
		}

		Ok(Criteria {
			language: needle(self.language),
			license: needle(self.license),
			name_contains: needle(self.name_contains),
			description_contains: needle(self.description_contains),
			min_size,
			max_size,
		})
	}
}

fn needle(value: Option<String>) -> Option<String> {
	value
		.filter(|v| !v.is_empty())
		.map(|v| v.to_lowercase())
}

fn size_bound(field: &'static str, value: i64) -> Result<Option<u64>, CriteriaError> {
	match value {
		v if v < 0 => Err(CriteriaError::NegativeSize { field, value: v }),
		0 => Ok(None),
		v => Ok(Some(v as u64)),
	}
}
