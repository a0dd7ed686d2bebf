//! Error types for DataTables draw handling.

use thiserror::Error;

/// Errors that can abort a table draw.
#[derive(Debug, Error)]
pub enum DataTableError {
	/// The client referenced a column index the table was not configured with.
	#[error("Column index {index} out of range (table has {len} columns)")]
	ColumnOutOfRange {
		/// Requested column index.
		index: usize,
		/// Number of configured columns.
		len: usize,
	},

	/// The incoming draw request could not be interpreted.
	#[error("Invalid draw request: {0}")]
	InvalidRequest(String),

	/// The pre-query hook rejected the draw.
	#[error("Before-query hook failed: {0}")]
	Hook(String),

	/// The count or fetch query failed.
	#[error("Data source error: {0}")]
	DataSource(String),

	/// The table configuration is inconsistent.
	#[error("Configuration error: {0}")]
	Config(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// TOML deserialization error.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Result type alias for draw operations.
pub type DataTableResult<T> = Result<T, DataTableError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_column_out_of_range_message() {
		let error = DataTableError::ColumnOutOfRange { index: 7, len: 3 };
		assert_eq!(
			error.to_string(),
			"Column index 7 out of range (table has 3 columns)"
		);
	}

	#[rstest]
	fn test_json_error_from() {
		let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let error: DataTableError = json_error.into();
		assert!(matches!(error, DataTableError::Json(_)));
	}
}
