//! Dotted field path resolution against plain JSON records
//!
//! Records reach the projector already materialized as nested JSON
//! mappings. A path such as `"user.email"` walks one object level per
//! segment; numeric segments index into arrays.

use serde_json::Value;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Resolves a dotted path against a record.
///
/// Returns `None` when any segment is missing, which callers treat as an
/// absent cell rather than an error.
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::field::resolve;
/// use serde_json::json;
///
/// let record = json!({"user": {"email": "alice@example.com"}});
/// assert_eq!(resolve(&record, "user.email"), Some(&json!("alice@example.com")));
/// assert_eq!(resolve(&record, "user.name"), None);
/// ```
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
	path.split(PATH_SEPARATOR)
		.try_fold(record, |current, segment| match current {
			Value::Object(map) => map.get(segment),
			Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
			_ => None,
		})
}

/// Resolves a dotted path, cloning the value or producing `Value::Null`
/// when the path is absent.
pub fn resolve_or_null(record: &Value, path: &str) -> Value {
	resolve(record, path).cloned().unwrap_or(Value::Null)
}

/// Splits a path into its segments.
pub fn segments(path: &str) -> Vec<&str> {
	path.split(PATH_SEPARATOR).collect()
}
