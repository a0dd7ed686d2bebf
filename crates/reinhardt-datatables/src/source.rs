//! Data-access collaborator
//!
//! Handlers never talk to a database directly. They hand [`QueryDraft`]s
//! to a [`DataSource`], which counts and fetches rows of its base entity
//! and returns them as plain JSON records.

use crate::entity::Entity;
use crate::error::DataTableResult;
use crate::query::QueryDraft;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A queryable base entity.
#[async_trait]
pub trait DataSource: Send + Sync {
	/// Counts rows matching the draft, ignoring offset and limit.
	async fn count(&self, query: &QueryDraft) -> DataTableResult<usize>;

	/// Fetches matching rows as plain nested mappings.
	async fn find_all(&self, query: &QueryDraft) -> DataTableResult<Vec<Value>>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
	async fn count(&self, query: &QueryDraft) -> DataTableResult<usize> {
		(**self).count(query).await
	}

	async fn find_all(&self, query: &QueryDraft) -> DataTableResult<Vec<Value>> {
		(**self).find_all(query).await
	}
}

/// The base entity of a table plus the relations joined into every draw.
#[derive(Clone)]
pub struct DataSourceDescriptor {
	base: Arc<dyn DataSource>,
	include: Vec<Entity>,
}

impl DataSourceDescriptor {
	/// Describes a table backed by `base` with no joined relations.
	pub fn new(base: Arc<dyn DataSource>) -> Self {
		Self {
			base,
			include: Vec::new(),
		}
	}

	/// Adds a joined relation.
	pub fn include(mut self, entity: Entity) -> Self {
		self.include.push(entity);
		self
	}

	/// Replaces the joined relations.
	pub fn with_includes(mut self, include: Vec<Entity>) -> Self {
		self.include = include;
		self
	}

	/// Returns the base data source.
	pub fn base(&self) -> &Arc<dyn DataSource> {
		&self.base
	}

	/// Returns the joined relations in declaration order.
	pub fn includes(&self) -> &[Entity] {
		&self.include
	}
}

impl fmt::Debug for DataSourceDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DataSourceDescriptor")
			.field("include", &self.include)
			.finish_non_exhaustive()
	}
}
