//! Per-table query options and the pre-query hook

use crate::error::DataTableResult;
use crate::output::OutputSpec;
use crate::query::QueryDraft;
use crate::request::DrawContext;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Caller hook run on every draft before the count and fetch queries.
///
/// The hook receives the draft by value and returns the draft to execute,
/// so it can add filters, joins or ordering. An error aborts the draw
/// before any query runs.
#[async_trait]
pub trait BeforeQuery: Send + Sync {
	/// Rewrites the draft for this invocation.
	async fn before_query(
		&self,
		ctx: &DrawContext,
		draft: QueryDraft,
	) -> DataTableResult<QueryDraft>;
}

/// Adapts a synchronous closure into a [`BeforeQuery`] hook.
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::options::{BeforeQuery, FnBeforeQuery};
/// use reinhardt_datatables::query::{Filter, FilterCondition, FilterOperator, FilterValue};
///
/// let hook = FnBeforeQuery::new(|ctx, mut draft| {
///     if let Some(owner) = ctx.param("owner") {
///         draft.and_where(FilterCondition::single(Filter::new(
///             "owner",
///             FilterOperator::Eq,
///             FilterValue::String(owner.to_string()),
///         )));
///     }
///     Ok(draft)
/// });
/// # let _ = hook;
/// ```
pub struct FnBeforeQuery<F> {
	func: F,
}

impl<F> FnBeforeQuery<F> {
	/// Wraps the closure.
	pub fn new(func: F) -> Self
	where
		F: Fn(&DrawContext, QueryDraft) -> DataTableResult<QueryDraft> + Send + Sync,
	{
		Self { func }
	}
}

#[async_trait]
impl<F> BeforeQuery for FnBeforeQuery<F>
where
	F: Fn(&DrawContext, QueryDraft) -> DataTableResult<QueryDraft> + Send + Sync,
{
	async fn before_query(
		&self,
		ctx: &DrawContext,
		draft: QueryDraft,
	) -> DataTableResult<QueryDraft> {
		(self.func)(ctx, draft)
	}
}

/// Search, output and hook configuration of one table.
#[derive(Clone, Default)]
pub struct QueryOptions {
	/// Field paths matched by the global search box.
	pub search_fields: BTreeSet<String>,
	/// One spec per output cell.
	pub output: Vec<OutputSpec>,
	/// Optional pre-query hook.
	pub before_query: Option<Arc<dyn BeforeQuery>>,
	/// Upper bound applied to the client's page length.
	pub max_page_length: Option<usize>,
}

impl QueryOptions {
	/// Creates options with no search fields and no output cells.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds searchable field paths.
	pub fn search_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.search_fields.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Sets the output cells.
	pub fn output(mut self, output: Vec<OutputSpec>) -> Self {
		self.output = output;
		self
	}

	/// Installs the pre-query hook.
	pub fn before_query<H: BeforeQuery + 'static>(mut self, hook: H) -> Self {
		self.before_query = Some(Arc::new(hook));
		self
	}

	/// Caps page length.
	pub fn max_page_length(mut self, max: usize) -> Self {
		self.max_page_length = Some(max);
		self
	}

	/// Applies [`max_page_length`](Self::max_page_length) to a requested length.
	pub fn effective_length(&self, requested: Option<usize>) -> Option<usize> {
		match (requested, self.max_page_length) {
			(Some(length), Some(max)) => Some(length.min(max)),
			(None, Some(max)) => Some(max),
			(requested, None) => requested,
		}
	}
}

impl fmt::Debug for QueryOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryOptions")
			.field("search_fields", &self.search_fields)
			.field("output", &self.output)
			.field("before_query", &self.before_query.is_some())
			.field("max_page_length", &self.max_page_length)
			.finish()
	}
}
