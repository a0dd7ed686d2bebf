//! Free-text search predicate
//!
//! The search box term is matched as a substring of every configured
//! search field, and a row matches if any field contains it.

use crate::query::{Filter, FilterCondition, FilterOperator, FilterValue};
use std::collections::BTreeSet;

/// Wraps a term into a `LIKE` containment pattern.
pub fn contains_pattern(term: &str) -> String {
	format!("%{}%", term)
}

/// Builds the OR-of-contains predicate, or `None` for an empty term.
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::search::build_predicate;
/// use std::collections::BTreeSet;
///
/// let fields: BTreeSet<String> = ["name".to_string(), "user.email".to_string()].into();
/// assert!(build_predicate("", &fields).is_none());
/// assert!(build_predicate("ali", &fields).is_some());
/// ```
pub fn build_predicate(term: &str, fields: &BTreeSet<String>) -> Option<FilterCondition> {
	if term.is_empty() {
		return None;
	}

	let pattern = contains_pattern(term);
	let conditions = fields
		.iter()
		.map(|field| {
			FilterCondition::single(Filter::new(
				field.as_str(),
				FilterOperator::Like,
				FilterValue::String(pattern.clone()),
			))
		})
		.collect();

	Some(FilterCondition::or(conditions))
}
