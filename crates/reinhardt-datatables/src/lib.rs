//! DataTables server-side processing for Reinhardt
//!
//! This crate turns DataTables pagination/search/sort requests into query
//! drafts for a data-access layer and shapes the fetched records into the
//! JSON contract the DataTables client expects.
//!
//! # Features
//!
//! - **Ordering**: client column indices map to flat or joined (`relation.field`) ordering
//! - **Search**: the search box becomes an OR of `LIKE %term%` predicates
//! - **Pagination**: `start`/`length` become offset/limit on the fetch query
//! - **Projection**: declarative output cells (field, field group, literal)
//! - **Hooks**: a pre-query hook can rewrite each draft
//! - **Configuration**: tables can be declared in TOML or JSON
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[TableDrawHandler] --> B[order]
//!     A --> C[search]
//!     A --> D[executor]
//!     A --> E[output]
//!     B --> F[entity registry]
//!     D --> G[DataSource]
//!     E --> H[field]
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod field;
pub mod handler;
pub mod memory;
pub mod options;
pub mod order;
pub mod output;
pub mod query;
pub mod request;
pub mod response;
pub mod search;
pub mod source;
pub mod views;

// Re-exports for convenience
pub use column::ColumnSpec;
pub use config::DataTableConfig;
pub use entity::{Entity, EntityRegistry};
pub use error::{DataTableError, DataTableResult};
pub use handler::TableDrawHandler;
pub use options::{BeforeQuery, FnBeforeQuery, QueryOptions};
pub use output::OutputSpec;
pub use request::{DrawContext, DrawRequest, SortDirection};
pub use response::DrawResponse;
pub use source::{DataSource, DataSourceDescriptor};

/// Commonly used types.
pub mod prelude {
	pub use crate::column::ColumnSpec;
	pub use crate::config::DataTableConfig;
	pub use crate::entity::{Entity, EntityRegistry};
	pub use crate::error::{DataTableError, DataTableResult};
	pub use crate::handler::TableDrawHandler;
	pub use crate::memory::MemoryDataSource;
	pub use crate::options::{BeforeQuery, FnBeforeQuery, QueryOptions};
	pub use crate::order::OrderInstruction;
	pub use crate::output::OutputSpec;
	pub use crate::query::{Filter, FilterCondition, FilterOperator, FilterValue, QueryDraft};
	pub use crate::request::{DrawContext, DrawRequest, OrderRequest, SortDirection};
	pub use crate::response::DrawResponse;
	pub use crate::source::{DataSource, DataSourceDescriptor};
}
