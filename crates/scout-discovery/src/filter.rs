//! Criteria filter.
//!
//! Every configured criterion is evaluated on its own and all of them must
//! hold; an unset criterion always holds. Substring checks ignore case and
//! size bounds are exclusive, measured on the size derived from the language
//! breakdown.

use scout_types::{Criteria, EnrichedRepository};

/// Whether `repo` satisfies every criterion in `criteria`.
pub fn matches(criteria: &Criteria, repo: &EnrichedRepository) -> bool {
	let candidate = &repo.candidate;

	let name = criteria
		.name_contains()
		.map_or(true, |needle| contains_ignore_case(&candidate.name, needle));

	let description = criteria
		.description_contains()
		.map_or(true, |needle| contains_ignore_case(&candidate.description, needle));

	let size = repo.size();
	let min_size = criteria.min_size().map_or(true, |min| size > min);
	let max_size = criteria.max_size().map_or(true, |max| size < max);

	let language = criteria.language().map_or(true, |needle| {
		repo.languages
			.keys()
			.any(|language| contains_ignore_case(language, needle))
	});

	let license = criteria
		.license()
		.map_or(true, |needle| contains_ignore_case(&repo.license, needle));

	name && description && min_size && max_size && language && license
}

// `needle` is already lower-cased by `Criteria`.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
	haystack.to_lowercase().contains(needle)
}
