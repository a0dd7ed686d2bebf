//! Declarative table configuration
//!
//! A table can be described in TOML (or JSON) and turned into a handler
//! once the data source and entity registry are known:
//!
//! ```toml
//! columns = ["serial_number", "user.email", "actions"]
//! include = ["User"]
//! search_fields = ["serial_number", "user.email"]
//! output = ["serial_number", "user.email", {}, ["edit_url", "delete_url"]]
//! max_page_length = 100
//! ```
//!
//! TOML has no null, so an empty inline table `{}` in `output` stands for
//! a `null` placeholder cell.

use crate::column::ColumnSpec;
use crate::entity::{Entity, EntityRegistry};
use crate::error::{DataTableError, DataTableResult};
use crate::handler::TableDrawHandler;
use crate::options::{BeforeQuery, QueryOptions};
use crate::output::OutputSpec;
use crate::source::{DataSource, DataSourceDescriptor};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Serializable description of one table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataTableConfig {
	/// Client column paths.
	pub columns: ColumnSpec,
	/// Names of registered entities joined into every draw.
	#[serde(default)]
	pub include: Vec<String>,
	/// Field paths matched by the search box.
	#[serde(default)]
	pub search_fields: Vec<String>,
	/// Raw output cell specs.
	#[serde(default)]
	pub output: Vec<Value>,
	/// Optional page length cap.
	#[serde(default)]
	pub max_page_length: Option<usize>,
}

impl DataTableConfig {
	/// Parses a TOML document.
	pub fn from_toml_str(source: &str) -> DataTableResult<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Parses a JSON document.
	pub fn from_json_str(source: &str) -> DataTableResult<Self> {
		Ok(serde_json::from_str(source)?)
	}

	/// Resolves included entity names against `registry`.
	pub fn includes(&self, registry: &EntityRegistry) -> DataTableResult<Vec<Entity>> {
		self.include
			.iter()
			.map(|name| {
				registry.get(name).cloned().ok_or_else(|| {
					DataTableError::Config(format!("included entity '{}' is not registered", name))
				})
			})
			.collect()
	}

	/// Output specs with `{}` placeholders mapped to `null`.
	pub fn output_specs(&self) -> Vec<OutputSpec> {
		self.output
			.iter()
			.map(|raw| match raw {
				Value::Object(map) if map.is_empty() => OutputSpec::null(),
				other => OutputSpec::from(other.clone()),
			})
			.collect()
	}

	/// Builds query options from this configuration.
	pub fn query_options(&self) -> QueryOptions {
		QueryOptions {
			search_fields: self.search_fields.iter().cloned().collect(),
			output: self.output_specs(),
			before_query: None,
			max_page_length: self.max_page_length,
		}
	}

	/// Builds a handler over `base`.
	pub fn into_handler(
		self,
		base: Arc<dyn DataSource>,
		registry: EntityRegistry,
	) -> DataTableResult<TableDrawHandler> {
		self.build(base, registry, None)
	}

	/// Builds a handler over `base` with a pre-query hook.
	pub fn into_handler_with_hook<H: BeforeQuery + 'static>(
		self,
		base: Arc<dyn DataSource>,
		registry: EntityRegistry,
		hook: H,
	) -> DataTableResult<TableDrawHandler> {
		self.build(base, registry, Some(Arc::new(hook)))
	}

	fn build(
		self,
		base: Arc<dyn DataSource>,
		registry: EntityRegistry,
		hook: Option<Arc<dyn BeforeQuery>>,
	) -> DataTableResult<TableDrawHandler> {
		let source = DataSourceDescriptor::new(base).with_includes(self.includes(&registry)?);
		let mut options = self.query_options();
		options.before_query = hook;
		Ok(TableDrawHandler::build(self.columns, source, registry, options))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryDataSource;
	use rstest::rstest;
	use serde_json::json;

	const TOML_CONFIG: &str = r#"
columns = ["serial_number", "user.email", "actions"]
include = ["User"]
search_fields = ["serial_number", "user.email"]
output = ["serial_number", "user.email", {}, ["edit_url", "delete_url"]]
max_page_length = 100
"#;

	#[rstest]
	fn test_parses_toml() {
		let config = DataTableConfig::from_toml_str(TOML_CONFIG).unwrap();
		assert_eq!(config.columns.len(), 3);
		assert_eq!(config.include, vec!["User"]);
		assert_eq!(config.max_page_length, Some(100));
		assert_eq!(
			config.output_specs(),
			vec![
				OutputSpec::field("serial_number"),
				OutputSpec::field("user.email"),
				OutputSpec::null(),
				OutputSpec::group(["edit_url", "delete_url"]),
			]
		);
	}

	#[rstest]
	fn test_parses_json_with_null_literal() {
		let config = DataTableConfig::from_json_str(
			r#"{"columns": ["id"], "output": ["id", null, 5]}"#,
		)
		.unwrap();
		assert_eq!(
			config.output_specs(),
			vec![
				OutputSpec::field("id"),
				OutputSpec::null(),
				OutputSpec::Literal(json!(5)),
			]
		);
		assert!(config.search_fields.is_empty());
	}

	#[rstest]
	fn test_unknown_include_is_rejected() {
		let config = DataTableConfig::from_toml_str(TOML_CONFIG).unwrap();
		let err = config
			.into_handler(Arc::new(MemoryDataSource::default()), EntityRegistry::new())
			.unwrap_err();
		assert!(matches!(err, DataTableError::Config(_)));
	}

	#[rstest]
	fn test_invalid_toml() {
		let err = DataTableConfig::from_toml_str("columns = 3").unwrap_err();
		assert!(matches!(err, DataTableError::Toml(_)));
	}

	#[rstest]
	fn test_builds_handler() {
		let config = DataTableConfig::from_toml_str(TOML_CONFIG).unwrap();
		let registry = EntityRegistry::new().with(Entity::new("User"));
		let handler = config
			.into_handler(Arc::new(MemoryDataSource::default()), registry)
			.unwrap();
		assert_eq!(handler.columns().len(), 3);
		assert_eq!(handler.options().search_fields.len(), 2);
	}
}
