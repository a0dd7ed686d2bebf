//! In-memory data source
//!
//! Evaluates query drafts over a vector of JSON records. Joined relations
//! are expected to be nested under the entity's accessor key, the way an
//! ORM materializes eager-loaded rows. `LIKE` matching is case-insensitive,
//! matching the default collation of MySQL and SQLite.

use crate::error::{DataTableError, DataTableResult};
use crate::field;
use crate::order::OrderInstruction;
use crate::query::{Filter, FilterCondition, FilterOperator, FilterValue, QueryDraft};
use crate::request::SortDirection;
use crate::source::DataSource;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;

/// A [`DataSource`] over records held in memory.
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::memory::MemoryDataSource;
/// use reinhardt_datatables::query::QueryDraft;
/// use reinhardt_datatables::source::DataSource;
/// use serde_json::json;
///
/// # futures::executor::block_on(async {
/// let source = MemoryDataSource::new(vec![json!({"id": 1}), json!({"id": 2})]);
/// let draft = QueryDraft::new(Vec::new(), Vec::new()).paginate(1, Some(10));
/// assert_eq!(source.count(&draft).await.unwrap(), 2);
/// assert_eq!(source.find_all(&draft).await.unwrap(), vec![json!({"id": 2})]);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryDataSource {
	records: RwLock<Vec<Value>>,
	// Only present for sources built with `recording`.
	executed: Option<RwLock<Vec<QueryDraft>>>,
}

impl MemoryDataSource {
	/// Creates a source holding `records`.
	pub fn new(records: Vec<Value>) -> Self {
		Self {
			records: RwLock::new(records),
			executed: None,
		}
	}

	/// Creates a source that also keeps every draft it receives, for
	/// inspecting the queries a draw issued.
	pub fn recording(records: Vec<Value>) -> Self {
		Self {
			records: RwLock::new(records),
			executed: Some(RwLock::new(Vec::new())),
		}
	}

	/// Appends a record.
	pub fn insert(&self, record: Value) {
		self.records.write().push(record);
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	/// Returns true if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}

	/// Drafts received so far, in arrival order. Always empty unless the
	/// source was built with [`recording`](Self::recording).
	pub fn executed(&self) -> Vec<QueryDraft> {
		self.executed
			.as_ref()
			.map(|log| log.read().clone())
			.unwrap_or_default()
	}

	fn matching(&self, query: &QueryDraft) -> DataTableResult<Vec<Value>> {
		if let Some(log) = &self.executed {
			log.write().push(query.clone());
		}

		let records = self.records.read();
		let mut matched = Vec::new();
		for record in records.iter() {
			let keep = match &query.where_clause {
				Some(condition) => matches(condition, record)?,
				None => true,
			};
			if keep {
				matched.push(record.clone());
			}
		}
		Ok(matched)
	}
}

#[async_trait]
impl DataSource for MemoryDataSource {
	async fn count(&self, query: &QueryDraft) -> DataTableResult<usize> {
		Ok(self.matching(query)?.len())
	}

	async fn find_all(&self, query: &QueryDraft) -> DataTableResult<Vec<Value>> {
		let mut rows = self.matching(query)?;
		// Stable sort keeps insertion order for ties.
		rows.sort_by(|a, b| compare_by(&query.order, a, b));

		let offset = query.offset.unwrap_or(0);
		let rows = rows.into_iter().skip(offset);
		Ok(match query.limit {
			Some(limit) => rows.take(limit).collect(),
			None => rows.collect(),
		})
	}
}

fn matches(condition: &FilterCondition, record: &Value) -> DataTableResult<bool> {
	Ok(match condition {
		FilterCondition::Single(filter) => matches_filter(filter, record)?,
		FilterCondition::And(conditions) => {
			for c in conditions {
				if !matches(c, record)? {
					return Ok(false);
				}
			}
			true
		}
		FilterCondition::Or(conditions) => {
			for c in conditions {
				if matches(c, record)? {
					return Ok(true);
				}
			}
			false
		}
		FilterCondition::Not(inner) => !matches(inner, record)?,
	})
}

fn matches_filter(filter: &Filter, record: &Value) -> DataTableResult<bool> {
	let actual = field::resolve(record, &filter.field);
	match filter.operator {
		FilterOperator::Eq => Ok(match (&filter.value, actual) {
			(FilterValue::Null, None | Some(Value::Null)) => true,
			(FilterValue::String(s), Some(Value::String(v))) => s == v,
			(FilterValue::Integer(i), Some(Value::Number(n))) => n.as_i64() == Some(*i),
			(FilterValue::Boolean(b), Some(Value::Bool(v))) => b == v,
			_ => false,
		}),
		FilterOperator::Like => {
			let FilterValue::String(pattern) = &filter.value else {
				return Err(DataTableError::DataSource(format!(
					"LIKE on '{}' needs a string pattern",
					filter.field
				)));
			};
			Ok(match actual.and_then(as_text) {
				Some(text) => like(pattern, &text),
				None => false,
			})
		}
	}
}

fn as_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

/// SQL `LIKE` with `%` (any run) and `_` (any one character), case-insensitive.
fn like(pattern: &str, text: &str) -> bool {
	let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
	let text: Vec<char> = text.to_lowercase().chars().collect();

	let (mut p, mut t) = (0, 0);
	let mut backtrack: Option<(usize, usize)> = None;

	while t < text.len() {
		match pattern.get(p) {
			Some('%') => {
				backtrack = Some((p, t));
				p += 1;
			}
			Some('_') => {
				p += 1;
				t += 1;
			}
			Some(c) if *c == text[t] => {
				p += 1;
				t += 1;
			}
			_ => match backtrack {
				Some((bp, bt)) => {
					backtrack = Some((bp, bt + 1));
					p = bp + 1;
					t = bt + 1;
				}
				None => return false,
			},
		}
	}

	pattern[p..].iter().all(|c| *c == '%')
}

fn compare_by(order: &[OrderInstruction], a: &Value, b: &Value) -> Ordering {
	for instruction in order {
		let (path, direction) = match instruction {
			OrderInstruction::Joined {
				entity,
				field,
				direction,
			} => (format!("{}.{}", entity.accessor(), field), *direction),
			OrderInstruction::Flat { path, direction } => (path.clone(), *direction),
		};
		let ordering = compare_values(field::resolve(a, &path), field::resolve(b, &path));
		let ordering = match direction {
			SortDirection::Asc => ordering,
			SortDirection::Desc => ordering.reverse(),
		};
		if ordering != Ordering::Equal {
			return ordering;
		}
	}
	Ordering::Equal
}

/// Nulls (and absent values) sort first, then booleans, numbers, strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	fn rank(value: Option<&Value>) -> u8 {
		match value {
			None | Some(Value::Null) => 0,
			Some(Value::Bool(_)) => 1,
			Some(Value::Number(_)) => 2,
			Some(Value::String(_)) => 3,
			Some(_) => 4,
		}
	}

	match (a, b) {
		(Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
		(Some(Value::Number(x)), Some(Value::Number(y))) => {
			let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
			x.partial_cmp(&y).unwrap_or(Ordering::Equal)
		}
		(Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
		_ => rank(a).cmp(&rank(b)),
	}
}
