//! The DataTables draw handler
//!
//! ```mermaid
//! graph LR
//!     A[DrawContext] --> B[order::translate]
//!     A --> C[search::build_predicate]
//!     B --> D[executor::prepare_draft]
//!     C --> D
//!     D --> E[before_query hook]
//!     E --> F[count]
//!     E --> G[find_all]
//!     F --> H[DrawResponse]
//!     G --> I[output::project_rows] --> H
//! ```

use crate::column::ColumnSpec;
use crate::entity::EntityRegistry;
use crate::error::DataTableResult;
use crate::executor;
use crate::options::QueryOptions;
use crate::order;
use crate::output;
use crate::request::DrawContext;
use crate::response::DrawResponse;
use crate::search;
use crate::source::DataSourceDescriptor;
use std::sync::Arc;

#[derive(Debug)]
struct HandlerConfig {
	columns: ColumnSpec,
	source: DataSourceDescriptor,
	registry: EntityRegistry,
	options: QueryOptions,
}

/// Serves DataTables draw requests for one configured table.
///
/// The handler holds only read-only configuration, so a single instance
/// (or its clones) can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::prelude::*;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # futures::executor::block_on(async {
/// let source = Arc::new(MemoryDataSource::new(vec![
///     json!({"id": 1, "serial_number": "A-1", "user": {"email": "alice@example.com"}}),
///     json!({"id": 2, "serial_number": "B-2", "user": {"email": "bob@example.com"}}),
/// ]));
/// let registry = EntityRegistry::new().with(Entity::new("User"));
/// let handler = TableDrawHandler::build(
///     ColumnSpec::new(["serial_number", "user.email"]),
///     DataSourceDescriptor::new(source).include(Entity::new("User")),
///     registry,
///     QueryOptions::new()
///         .search_fields(["serial_number", "user.email"])
///         .output(vec![OutputSpec::field("serial_number"), OutputSpec::field("user.email")]),
/// );
///
/// let ctx = DrawContext::new(DrawRequest::page(0, 10).search("bob").order_by(1, SortDirection::Asc));
/// let response = handler.handle(&ctx).await.unwrap();
/// assert_eq!(response.records_total, 1);
/// assert_eq!(response.data, vec![vec![json!("B-2"), json!("bob@example.com")]]);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TableDrawHandler {
	config: Arc<HandlerConfig>,
}

impl TableDrawHandler {
	/// Builds a handler for a table.
	///
	/// `columns` must list the field path of every client column in client
	/// column order; `registry` resolves the relation part of `relation.field`
	/// column paths.
	pub fn build(
		columns: ColumnSpec,
		source: DataSourceDescriptor,
		registry: EntityRegistry,
		options: QueryOptions,
	) -> Self {
		Self {
			config: Arc::new(HandlerConfig {
				columns,
				source,
				registry,
				options,
			}),
		}
	}

	/// Returns the configured columns.
	pub fn columns(&self) -> &ColumnSpec {
		&self.config.columns
	}

	/// Returns the configured options.
	pub fn options(&self) -> &QueryOptions {
		&self.config.options
	}

	/// Serves one draw.
	pub async fn handle(&self, ctx: &DrawContext) -> DataTableResult<DrawResponse> {
		let HandlerConfig {
			columns,
			source,
			registry,
			options,
		} = &*self.config;
		let request = &ctx.request;

		let order = order::translate(columns, registry, &request.order)?;
		let predicate = search::build_predicate(&request.search.value, &options.search_fields);
		let length = options.effective_length(request.length);

		tracing::debug!(
			order_terms = order.len(),
			searching = predicate.is_some(),
			start = request.start,
			?length,
			"table draw"
		);

		let draft = executor::prepare_draft(
			source,
			ctx,
			order,
			predicate,
			options.before_query.as_deref(),
		)
		.await?;
		let outcome = executor::execute(source, draft, request.start, length).await?;

		let data = output::project_rows(&outcome.records, &options.output);
		let response = DrawResponse::new(data, outcome.total);
		tracing::debug!(
			draw = response.draw,
			total = response.records_total,
			rows = response.data.len(),
			"table draw served"
		);
		Ok(response)
	}

	/// Parses a DataTables query string and serves the draw.
	pub async fn handle_query(&self, query: &str) -> DataTableResult<DrawResponse> {
		let ctx = DrawContext::from_query_string(query)?;
		self.handle(&ctx).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryDataSource;
	use crate::output::OutputSpec;
	use crate::request::DrawRequest;
	use serde_json::json;
	use std::fmt;
	use std::sync::Mutex;
	use tracing_subscriber::layer::SubscriberExt as _;
	use tracing_subscriber::util::SubscriberInitExt as _;

	/// Collects the `draw` field of every event.
	struct DrawCapture {
		draws: Arc<Mutex<Vec<i64>>>,
	}

	impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for DrawCapture {
		fn on_event(
			&self,
			event: &tracing::Event<'_>,
			_ctx: tracing_subscriber::layer::Context<'_, S>,
		) {
			struct DrawVisitor {
				draw: Option<i64>,
			}

			impl tracing::field::Visit for DrawVisitor {
				fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
					if field.name() == "draw" {
						self.draw = Some(value);
					}
				}

				fn record_debug(&mut self, _field: &tracing::field::Field, _value: &dyn fmt::Debug) {}
			}

			let mut visitor = DrawVisitor { draw: None };
			event.record(&mut visitor);
			if let Some(draw) = visitor.draw {
				self.draws.lock().unwrap().push(draw);
			}
		}
	}

	#[tokio::test]
	async fn test_served_draw_logs_its_token() {
		let draws = Arc::new(Mutex::new(Vec::new()));
		let _guard = tracing_subscriber::registry()
			.with(DrawCapture {
				draws: draws.clone(),
			})
			.set_default();

		let handler = TableDrawHandler::build(
			ColumnSpec::new(["id"]),
			DataSourceDescriptor::new(Arc::new(MemoryDataSource::new(vec![json!({"id": 1})]))),
			EntityRegistry::new(),
			QueryOptions::new().output(vec![OutputSpec::field("id")]),
		);
		let response = handler
			.handle(&DrawContext::new(DrawRequest::page(0, 10)))
			.await
			.unwrap();

		assert_eq!(*draws.lock().unwrap(), vec![response.draw]);
	}
}
