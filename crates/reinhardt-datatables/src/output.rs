//! Projection of fetched records into DataTables rows
//!
//! Each configured [`OutputSpec`] produces exactly one cell of every row:
//!
//! - [`OutputSpec::FieldRef`] resolves a dotted path (absent paths become `null`)
//! - [`OutputSpec::FieldGroup`] resolves several paths into an object keyed by path
//! - [`OutputSpec::Literal`] is emitted verbatim, typically `null` for
//!   columns the client renders itself

use crate::field;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One output cell specification.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSpec {
	/// Resolve a single field path.
	FieldRef(String),
	/// Resolve several field paths into a mapping.
	FieldGroup(Vec<String>),
	/// Emit a value unchanged.
	Literal(Value),
}

impl OutputSpec {
	/// Shorthand for [`OutputSpec::FieldRef`].
	pub fn field(path: impl Into<String>) -> Self {
		Self::FieldRef(path.into())
	}

	/// Shorthand for [`OutputSpec::FieldGroup`].
	pub fn group<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::FieldGroup(paths.into_iter().map(Into::into).collect())
	}

	/// A `null` placeholder cell.
	pub fn null() -> Self {
		Self::Literal(Value::Null)
	}

	/// Produces this cell for one record.
	pub fn project(&self, record: &Value) -> Value {
		match self {
			Self::FieldRef(path) => field::resolve_or_null(record, path),
			Self::FieldGroup(paths) => {
				// Absent paths are left out of the mapping.
				let map: Map<String, Value> = paths
					.iter()
					.filter_map(|path| {
						field::resolve(record, path).map(|value| (path.clone(), value.clone()))
					})
					.collect();
				Value::Object(map)
			}
			Self::Literal(value) => value.clone(),
		}
	}
}

/// Configuration files use the untagged form: a string is a field path, an
/// array of strings is a group, anything else is a literal.
impl From<Value> for OutputSpec {
	fn from(value: Value) -> Self {
		match value {
			Value::String(path) => Self::FieldRef(path),
			Value::Array(items) if items.iter().all(Value::is_string) => {
				Self::FieldGroup(
					items
						.into_iter()
						.filter_map(|item| match item {
							Value::String(s) => Some(s),
							_ => None,
						})
						.collect(),
				)
			}
			other => Self::Literal(other),
		}
	}
}

impl From<&OutputSpec> for Value {
	fn from(spec: &OutputSpec) -> Self {
		match spec {
			OutputSpec::FieldRef(path) => Value::String(path.clone()),
			OutputSpec::FieldGroup(paths) => {
				Value::Array(paths.iter().cloned().map(Value::String).collect())
			}
			OutputSpec::Literal(value) => value.clone(),
		}
	}
}

impl<'de> Deserialize<'de> for OutputSpec {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Value::deserialize(deserializer).map(Self::from)
	}
}

impl Serialize for OutputSpec {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		Value::from(self).serialize(serializer)
	}
}

/// Projects one record into a row with one cell per spec.
pub fn project_row(record: &Value, output: &[OutputSpec]) -> Vec<Value> {
	output.iter().map(|spec| spec.project(record)).collect()
}

/// Projects every fetched record, preserving fetch order.
pub fn project_rows(records: &[Value], output: &[OutputSpec]) -> Vec<Vec<Value>> {
	records
		.iter()
		.map(|record| project_row(record, output))
		.collect()
}
