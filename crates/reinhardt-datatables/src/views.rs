//! Partial registration for the rendering layer
//!
//! The table markup itself is rendered elsewhere. This module only claims
//! the well-known `datatable_view` partial name, once.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Name under which the table partial is registered.
pub const DATATABLE_VIEW: &str = "datatable_view";

/// Template path registered for [`DATATABLE_VIEW`].
pub const DATATABLE_VIEW_TEMPLATE: &str = "reinhardt_datatables/datatable_view.html";

static GLOBAL_PARTIALS: Lazy<PartialRegistry> = Lazy::new(PartialRegistry::new);

/// Write-once mapping from partial name to template path.
#[derive(Debug, Default)]
pub struct PartialRegistry {
	partials: RwLock<HashMap<String, String>>,
}

impl PartialRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `path` under `name` unless the name is taken.
	///
	/// Returns true if this call performed the registration.
	pub fn register_if_absent(&self, name: impl Into<String>, path: impl Into<String>) -> bool {
		let mut partials = self.partials.write();
		let name = name.into();
		if partials.contains_key(&name) {
			return false;
		}
		partials.insert(name, path.into());
		true
	}

	/// Returns the template path registered under `name`.
	pub fn get(&self, name: &str) -> Option<String> {
		self.partials.read().get(name).cloned()
	}
}

/// Returns the process-wide partial registry.
pub fn global() -> &'static PartialRegistry {
	&GLOBAL_PARTIALS
}

/// Registers the table partial in `registry`; later calls are no-ops.
pub fn init(registry: &PartialRegistry) -> bool {
	let registered = registry.register_if_absent(DATATABLE_VIEW, DATATABLE_VIEW_TEMPLATE);
	if registered {
		tracing::debug!(partial = DATATABLE_VIEW, "registered datatable partial");
	}
	registered
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_init_is_idempotent() {
		let registry = PartialRegistry::new();
		assert!(init(&registry));
		assert!(!init(&registry));
		assert_eq!(
			registry.get(DATATABLE_VIEW).as_deref(),
			Some(DATATABLE_VIEW_TEMPLATE)
		);
	}

	#[rstest]
	fn test_init_keeps_existing_registration() {
		let registry = PartialRegistry::new();
		registry.register_if_absent(DATATABLE_VIEW, "custom/table.html");
		assert!(!init(&registry));
		assert_eq!(registry.get(DATATABLE_VIEW).as_deref(), Some("custom/table.html"));
	}

	#[rstest]
	fn test_global_registry() {
		init(global());
		assert!(global().get(DATATABLE_VIEW).is_some());
	}
}
