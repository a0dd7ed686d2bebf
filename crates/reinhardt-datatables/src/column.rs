//! Client column configuration
//!
//! The position of each path is the column index the DataTables client
//! sends back in `order[i][column]`. The list is fixed once a handler is
//! built.

use crate::error::{DataTableError, DataTableResult};
use serde::{Deserialize, Serialize};

/// Ordered list of column field paths, each either `field` or `relation.field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSpec {
	paths: Vec<String>,
}

impl ColumnSpec {
	/// Creates a column spec from field paths in client column order.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datatables::column::ColumnSpec;
	///
	/// let columns = ColumnSpec::new(["serial_number", "user.email"]);
	/// assert_eq!(columns.len(), 2);
	/// assert_eq!(columns.get(1).unwrap(), "user.email");
	/// assert!(columns.get(2).is_err());
	/// ```
	pub fn new<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			paths: paths.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns the path configured for a client column index.
	pub fn get(&self, index: usize) -> DataTableResult<&str> {
		self.paths
			.get(index)
			.map(String::as_str)
			.ok_or(DataTableError::ColumnOutOfRange {
				index,
				len: self.paths.len(),
			})
	}

	/// Number of configured columns.
	pub fn len(&self) -> usize {
		self.paths.len()
	}

	/// Returns true if no columns are configured.
	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	/// Iterates over the configured paths.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.paths.iter().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_out_of_range_reports_length() {
		let columns = ColumnSpec::new(["id"]);
		let err = columns.get(4).unwrap_err();
		assert!(matches!(
			err,
			DataTableError::ColumnOutOfRange { index: 4, len: 1 }
		));
	}

	#[rstest]
	fn test_deserializes_from_plain_array() {
		let columns: ColumnSpec = serde_json::from_str(r#"["id", "user.email"]"#).unwrap();
		assert_eq!(columns.iter().collect::<Vec<_>>(), vec!["id", "user.email"]);
	}
}
