//! Count + fetch execution for one draw

use crate::error::DataTableResult;
use crate::options::BeforeQuery;
use crate::query::{FilterCondition, QueryDraft};
use crate::order::OrderInstruction;
use crate::request::DrawContext;
use crate::source::DataSourceDescriptor;
use serde_json::Value;

/// Matching row count and the fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
	/// Rows matching the filter, regardless of pagination.
	pub total: usize,
	/// Records of the requested page.
	pub records: Vec<Value>,
}

/// Builds the draft for one draw and runs the caller hook on it.
pub async fn prepare_draft(
	source: &DataSourceDescriptor,
	ctx: &DrawContext,
	order: Vec<OrderInstruction>,
	where_clause: Option<FilterCondition>,
	hook: Option<&dyn BeforeQuery>,
) -> DataTableResult<QueryDraft> {
	let draft = QueryDraft::new(source.includes().to_vec(), order).with_where(where_clause);

	match hook {
		Some(hook) => hook.before_query(ctx, draft).await.inspect_err(|e| {
			tracing::error!(error = %e, "before-query hook aborted draw");
		}),
		None => Ok(draft),
	}
}

/// Issues the count and the paginated fetch concurrently.
///
/// The count runs against the draft as given; the fetch adds offset,
/// limit and disables sub-query wrapping. Either failure fails the draw.
pub async fn execute(
	source: &DataSourceDescriptor,
	draft: QueryDraft,
	offset: usize,
	limit: Option<usize>,
) -> DataTableResult<QueryOutcome> {
	let count_query = draft.clone();
	let fetch_query = draft.paginate(offset, limit);
	let base = source.base();

	let (total, records) = futures::try_join!(base.count(&count_query), base.find_all(&fetch_query))
		.inspect_err(|e| {
			tracing::error!(error = %e, "table draw query failed");
		})?;

	tracing::debug!(total, fetched = records.len(), offset, ?limit, "table draw queries completed");

	Ok(QueryOutcome { total, records })
}
