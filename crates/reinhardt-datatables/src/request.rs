//! Incoming draw requests
//!
//! A DataTables client sends its state either as JSON or, more commonly,
//! as bracketed query parameters:
//!
//! ```text
//! order[0][column]=1&order[0][dir]=desc&search[value]=ali&start=20&length=10
//! ```
//!
//! Numeric fields arrive as numbers or numeric strings. A negative
//! `length` (the client's "show all") means no page limit.

use crate::error::{DataTableError, DataTableResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Sort direction of one ordered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortDirection {
	/// Ascending order.
	#[default]
	Asc,
	/// Descending order.
	Desc,
}

impl SortDirection {
	/// Returns the lowercase wire form.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

impl fmt::Display for SortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SortDirection {
	type Err = DataTableError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"asc" => Ok(Self::Asc),
			"desc" => Ok(Self::Desc),
			other => Err(DataTableError::InvalidRequest(format!(
				"unknown sort direction '{}'",
				other
			))),
		}
	}
}

impl TryFrom<String> for SortDirection {
	type Error = DataTableError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

/// One `order[i]` entry: a client column index and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
	/// Client-side column index.
	#[serde(deserialize_with = "index_from_number_or_string")]
	pub column: usize,
	/// Requested direction.
	#[serde(default)]
	pub dir: SortDirection,
}

impl OrderRequest {
	/// Creates an order entry.
	pub fn new(column: usize, dir: SortDirection) -> Self {
		Self { column, dir }
	}
}

/// The global search box state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	/// Free-text search term; empty means unfiltered.
	#[serde(default)]
	pub value: String,
}

/// Per-call DataTables state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
	/// Ordering entries, applied in sequence.
	#[serde(default)]
	pub order: Vec<OrderRequest>,
	/// Global search.
	#[serde(default)]
	pub search: SearchRequest,
	/// Row offset of the requested page.
	#[serde(default, deserialize_with = "index_from_number_or_string")]
	pub start: usize,
	/// Page size; `None` fetches every matching row.
	#[serde(default, deserialize_with = "length_from_number_or_string")]
	pub length: Option<usize>,
}

impl DrawRequest {
	/// Creates an unordered, unfiltered request for one page.
	pub fn page(start: usize, length: usize) -> Self {
		Self {
			start,
			length: Some(length),
			..Self::default()
		}
	}

	/// Sets the search term.
	pub fn search(mut self, value: impl Into<String>) -> Self {
		self.search.value = value.into();
		self
	}

	/// Appends an ordering entry.
	pub fn order_by(mut self, column: usize, dir: SortDirection) -> Self {
		self.order.push(OrderRequest::new(column, dir));
		self
	}

	/// Parses the bracketed DataTables query string.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datatables::request::{DrawRequest, SortDirection};
	///
	/// let request = DrawRequest::from_query_string(
	///     "order%5B0%5D%5Bcolumn%5D=1&order%5B0%5D%5Bdir%5D=desc&search%5Bvalue%5D=ali&start=20&length=10",
	/// ).unwrap();
	/// assert_eq!(request.order[0].column, 1);
	/// assert_eq!(request.order[0].dir, SortDirection::Desc);
	/// assert_eq!(request.search.value, "ali");
	/// assert_eq!(request.start, 20);
	/// assert_eq!(request.length, Some(10));
	/// ```
	pub fn from_query_string(query: &str) -> DataTableResult<Self> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
			.map_err(|e| DataTableError::InvalidRequest(e.to_string()))?;
		Self::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
	}

	/// Builds a request from already-decoded query parameters.
	pub fn from_pairs<'a, I>(pairs: I) -> DataTableResult<Self>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let mut request = Self::default();
		let mut order: BTreeMap<usize, (Option<usize>, Option<SortDirection>)> = BTreeMap::new();

		for (key, value) in pairs {
			match key {
				"search[value]" => request.search.value = value.to_string(),
				"start" => request.start = parse_index("start", value)?,
				"length" => request.length = parse_length(value)?,
				_ => {
					if let Some((position, attr)) = parse_order_key(key) {
						let entry = order.entry(position).or_default();
						match attr {
							"column" => entry.0 = Some(parse_index(key, value)?),
							"dir" => entry.1 = Some(value.parse()?),
							_ => {}
						}
					}
				}
			}
		}

		request.order = order
			.into_iter()
			.map(|(position, (column, dir))| -> DataTableResult<OrderRequest> {
				let column = column.ok_or_else(|| {
					DataTableError::InvalidRequest(format!(
						"order[{}] is missing its column",
						position
					))
				})?;
				Ok(OrderRequest::new(column, dir.unwrap_or_default()))
			})
			.collect::<DataTableResult<Vec<_>>>()?;

		Ok(request)
	}
}

/// Everything a handler invocation knows about its caller.
///
/// The raw query parameters travel alongside the parsed request so a
/// pre-query hook can scope the draw (for example by an owner id).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawContext {
	/// Parsed DataTables state.
	pub request: DrawRequest,
	/// Raw decoded query parameters.
	pub params: HashMap<String, String>,
}

impl DrawContext {
	/// Wraps a request with no extra parameters.
	pub fn new(request: DrawRequest) -> Self {
		Self {
			request,
			params: HashMap::new(),
		}
	}

	/// Parses a query string into both the request and the raw parameters.
	pub fn from_query_string(query: &str) -> DataTableResult<Self> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
			.map_err(|e| DataTableError::InvalidRequest(e.to_string()))?;
		let request = DrawRequest::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
		Ok(Self {
			request,
			params: pairs.into_iter().collect(),
		})
	}

	/// Adds a raw parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Returns a raw parameter.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}
}

/// Splits `order[3][dir]` into `(3, "dir")`.
fn parse_order_key(key: &str) -> Option<(usize, &str)> {
	let rest = key.strip_prefix("order[")?;
	let (position, rest) = rest.split_once(']')?;
	let attr = rest.strip_prefix('[')?.strip_suffix(']')?;
	Some((position.parse().ok()?, attr))
}

fn parse_index(name: &str, value: &str) -> DataTableResult<usize> {
	value.trim().parse().map_err(|_| {
		DataTableError::InvalidRequest(format!(
			"{} must be a non-negative integer, got '{}'",
			name, value
		))
	})
}

fn parse_length(value: &str) -> DataTableResult<Option<usize>> {
	let length: i64 = value.trim().parse().map_err(|_| {
		DataTableError::InvalidRequest(format!("length must be an integer, got '{}'", value))
	})?;
	Ok(usize::try_from(length).ok())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
	Number(i64),
	Text(String),
}

impl NumberOrString {
	fn into_i64(self) -> Result<i64, String> {
		match self {
			Self::Number(n) => Ok(n),
			Self::Text(s) => s
				.trim()
				.parse()
				.map_err(|_| format!("expected an integer, got '{}'", s)),
		}
	}
}

fn index_from_number_or_string<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
	D: Deserializer<'de>,
{
	let n = NumberOrString::deserialize(deserializer)?
		.into_i64()
		.map_err(serde::de::Error::custom)?;
	usize::try_from(n).map_err(|_| {
		serde::de::Error::custom(format!("expected a non-negative integer, got {}", n))
	})
}

fn length_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
	D: Deserializer<'de>,
{
	let n = NumberOrString::deserialize(deserializer)?
		.into_i64()
		.map_err(serde::de::Error::custom)?;
	Ok(usize::try_from(n).ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("asc", SortDirection::Asc)]
	#[case("DESC", SortDirection::Desc)]
	#[case("Desc", SortDirection::Desc)]
	fn test_direction_parse(#[case] input: &str, #[case] expected: SortDirection) {
		assert_eq!(input.parse::<SortDirection>().unwrap(), expected);
	}

	#[rstest]
	fn test_direction_rejects_unknown() {
		assert!("sideways".parse::<SortDirection>().is_err());
	}

	#[rstest]
	fn test_json_accepts_numeric_strings() {
		let request: DrawRequest = serde_json::from_str(
			r#"{"order":[{"column":"2","dir":"desc"}],"search":{"value":"x"},"start":"10","length":"25"}"#,
		)
		.unwrap();
		assert_eq!(request.order, vec![OrderRequest::new(2, SortDirection::Desc)]);
		assert_eq!(request.start, 10);
		assert_eq!(request.length, Some(25));
	}

	#[rstest]
	fn test_json_negative_length_means_unlimited() {
		let request: DrawRequest = serde_json::from_str(r#"{"start":0,"length":-1}"#).unwrap();
		assert_eq!(request.length, None);
	}

	#[rstest]
	fn test_json_defaults() {
		let request: DrawRequest = serde_json::from_str("{}").unwrap();
		assert!(request.order.is_empty());
		assert_eq!(request.search.value, "");
		assert_eq!(request.start, 0);
		assert_eq!(request.length, None);
	}

	#[rstest]
	fn test_query_string_orders_by_position() {
		let request = DrawRequest::from_pairs([
			("order[1][column]", "3"),
			("order[0][column]", "0"),
			("order[0][dir]", "desc"),
			("columns[0][data]", "0"),
			("draw", "7"),
		])
		.unwrap();
		assert_eq!(
			request.order,
			vec![
				OrderRequest::new(0, SortDirection::Desc),
				OrderRequest::new(3, SortDirection::Asc),
			]
		);
	}

	#[rstest]
	fn test_query_string_missing_column_is_invalid() {
		let err = DrawRequest::from_pairs([("order[0][dir]", "asc")]).unwrap_err();
		assert!(matches!(err, DataTableError::InvalidRequest(_)));
	}

	#[rstest]
	#[case("start", "abc")]
	#[case("start", "-3")]
	#[case("length", "ten")]
	#[case("order[0][column]", "x")]
	fn test_query_string_rejects_non_numeric(#[case] key: &str, #[case] value: &str) {
		assert!(DrawRequest::from_pairs([(key, value)]).is_err());
	}

	#[rstest]
	fn test_context_keeps_raw_params() {
		let ctx = DrawContext::from_query_string("search%5Bvalue%5D=bob&owner=5").unwrap();
		assert_eq!(ctx.request.search.value, "bob");
		assert_eq!(ctx.param("owner"), Some("5"));
	}

	#[rstest]
	#[case("order[0][column]", Some((0, "column")))]
	#[case("order[12][dir]", Some((12, "dir")))]
	#[case("order[x][dir]", None)]
	#[case("columns[0][data]", None)]
	fn test_parse_order_key(#[case] key: &str, #[case] expected: Option<(usize, &str)>) {
		assert_eq!(parse_order_key(key), expected);
	}
}
