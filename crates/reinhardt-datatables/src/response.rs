//! DataTables server-side processing response

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_DRAW: AtomicI64 = AtomicI64::new(0);

/// Returns the current Unix time in milliseconds, bumped when needed so
/// that tokens issued by this process are strictly increasing.
pub fn next_draw_token() -> i64 {
	let now = chrono::Utc::now().timestamp_millis();
	let previous = LAST_DRAW
		.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
			Some(now.max(last + 1))
		})
		.unwrap_or_else(|last| last);
	now.max(previous + 1)
}

/// The JSON body returned to the client.
///
/// ```json
/// {"data": [[...], ...], "draw": 1718000000000, "recordsFiltered": 12, "recordsTotal": 12}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
	/// Projected rows of the requested page.
	pub data: Vec<Vec<Value>>,
	/// Token correlating this response with its request.
	pub draw: i64,
	/// Rows matching the current search.
	pub records_filtered: usize,
	/// Same as `records_filtered`; no separate unfiltered total is computed.
	pub records_total: usize,
}

impl DrawResponse {
	/// Builds a response for `total` matching rows with a fresh draw token.
	pub fn new(data: Vec<Vec<Value>>, total: usize) -> Self {
		Self {
			data,
			draw: next_draw_token(),
			records_filtered: total,
			records_total: total,
		}
	}
}
