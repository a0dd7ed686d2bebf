//! Query drafts handed to the data source
//!
//! A [`QueryDraft`] mirrors what an ORM `count`/`find_all` call accepts:
//! joined entities, ordering, a filter tree, pagination and a flag that
//! controls sub-query wrapping of joined, paginated selects.

use crate::entity::Entity;
use crate::order::OrderInstruction;
use serde::Serialize;

/// Comparison operators understood inside a `where` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOperator {
	/// Exact equality.
	Eq,
	/// SQL `LIKE` pattern match using `%` and `_` wildcards.
	Like,
}

/// Right-hand side of a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterValue {
	/// Text value or pattern.
	String(String),
	/// Integer value.
	Integer(i64),
	/// Boolean value.
	Boolean(bool),
	/// SQL null.
	Null,
}

/// A single `field <op> value` predicate. `field` may be a dotted path
/// into an included relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
	/// Field path.
	pub field: String,
	/// Operator.
	pub operator: FilterOperator,
	/// Compared value.
	pub value: FilterValue,
}

impl Filter {
	/// Creates a filter.
	pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
		Self {
			field: field.into(),
			operator,
			value,
		}
	}
}

/// Composite filter condition supporting AND/OR logic
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::query::{Filter, FilterCondition, FilterOperator, FilterValue};
///
/// let search = FilterCondition::or(vec![
///     FilterCondition::single(Filter::new(
///         "name",
///         FilterOperator::Like,
///         FilterValue::String("%ali%".to_string()),
///     )),
///     FilterCondition::single(Filter::new(
///         "email",
///         FilterOperator::Like,
///         FilterValue::String("%ali%".to_string()),
///     )),
/// ]);
/// assert!(matches!(search, FilterCondition::Or(ref c) if c.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterCondition {
	/// A single filter expression
	Single(Filter),
	/// All conditions must match (AND logic)
	And(Vec<FilterCondition>),
	/// Any condition must match (OR logic)
	Or(Vec<FilterCondition>),
	/// Negates the inner condition (NOT logic)
	Not(Box<FilterCondition>),
}

impl FilterCondition {
	/// Create a single filter condition
	pub fn single(filter: Filter) -> Self {
		Self::Single(filter)
	}

	/// Create an AND condition from multiple conditions
	pub fn and(conditions: Vec<FilterCondition>) -> Self {
		Self::And(conditions)
	}

	/// Create an OR condition from multiple conditions
	pub fn or(conditions: Vec<FilterCondition>) -> Self {
		Self::Or(conditions)
	}

	/// Create a NOT condition that negates the given condition
	#[allow(clippy::should_implement_trait)]
	pub fn not(condition: FilterCondition) -> Self {
		Self::Not(Box::new(condition))
	}
}

/// A count/fetch query under construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDraft {
	/// Relations joined into the query.
	pub include: Vec<Entity>,
	/// Ordering, applied in sequence.
	pub order: Vec<OrderInstruction>,
	/// Filter tree; `None` means unfiltered.
	#[serde(rename = "where")]
	pub where_clause: Option<FilterCondition>,
	/// Rows to skip.
	pub offset: Option<usize>,
	/// Maximum rows to return.
	pub limit: Option<usize>,
	/// Whether the backend may wrap the base select in a sub-query.
	#[serde(rename = "subQuery")]
	pub sub_query: bool,
}

impl QueryDraft {
	/// Creates an unpaginated draft.
	pub fn new(include: Vec<Entity>, order: Vec<OrderInstruction>) -> Self {
		Self {
			include,
			order,
			where_clause: None,
			offset: None,
			limit: None,
			sub_query: true,
		}
	}

	/// Sets the filter tree.
	pub fn with_where(mut self, condition: Option<FilterCondition>) -> Self {
		self.where_clause = condition;
		self
	}

	/// ANDs an extra condition into the existing filter tree.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datatables::query::{
	///     Filter, FilterCondition, FilterOperator, FilterValue, QueryDraft,
	/// };
	///
	/// let mut draft = QueryDraft::new(Vec::new(), Vec::new());
	/// draft.and_where(FilterCondition::single(Filter::new(
	///     "owner_id",
	///     FilterOperator::Eq,
	///     FilterValue::Integer(5),
	/// )));
	/// assert!(matches!(draft.where_clause, Some(FilterCondition::Single(_))));
	/// ```
	pub fn and_where(&mut self, condition: FilterCondition) {
		self.where_clause = Some(match self.where_clause.take() {
			None => condition,
			Some(FilterCondition::And(mut conditions)) => {
				conditions.push(condition);
				FilterCondition::And(conditions)
			}
			Some(existing) => FilterCondition::And(vec![existing, condition]),
		});
	}

	/// Turns the draft into a paginated fetch with sub-query wrapping
	/// disabled, so joined rows cannot skew offset/limit.
	pub fn paginate(mut self, offset: usize, limit: Option<usize>) -> Self {
		self.offset = Some(offset);
		self.limit = limit;
		self.sub_query = false;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn eq(field: &str, value: i64) -> FilterCondition {
		FilterCondition::single(Filter::new(field, FilterOperator::Eq, FilterValue::Integer(value)))
	}

	#[rstest]
	fn test_and_where_wraps_existing_condition() {
		let mut draft = QueryDraft::new(Vec::new(), Vec::new()).with_where(Some(eq("a", 1)));
		draft.and_where(eq("b", 2));
		draft.and_where(eq("c", 3));
		assert_eq!(
			draft.where_clause,
			Some(FilterCondition::and(vec![eq("a", 1), eq("b", 2), eq("c", 3)]))
		);
	}

	#[rstest]
	fn test_paginate_disables_sub_query() {
		let draft = QueryDraft::new(Vec::new(), Vec::new());
		assert!(draft.sub_query);
		let fetch = draft.paginate(20, Some(10));
		assert_eq!(fetch.offset, Some(20));
		assert_eq!(fetch.limit, Some(10));
		assert!(!fetch.sub_query);
	}

	#[rstest]
	fn test_serializes_with_orm_field_names() {
		let draft = QueryDraft::new(Vec::new(), Vec::new()).paginate(0, None);
		let json = serde_json::to_value(&draft).unwrap();
		assert!(json.get("where").is_some());
		assert_eq!(json["subQuery"], serde_json::json!(false));
	}
}
