//! Common test fixtures for reinhardt-datatables tests

#![allow(dead_code)]

use reinhardt_datatables::prelude::*;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

/// Column paths in client column order.
pub const COLUMNS: [&str; 4] = ["serial_number", "user.email", "name", "actions"];

/// Seeded devices; device 5 has no owning user.
#[fixture]
pub fn device_records() -> Vec<Value> {
	vec![
		json!({
			"id": 1,
			"serial_number": "SN-001",
			"name": "Router",
			"user": {"email": "alice@example.com"},
			"edit_url": "/devices/1/edit",
			"delete_url": "/devices/1/delete"
		}),
		json!({
			"id": 2,
			"serial_number": "SN-002",
			"name": "Switch",
			"user": {"email": "bob@example.com"},
			"edit_url": "/devices/2/edit",
			"delete_url": "/devices/2/delete"
		}),
		json!({
			"id": 3,
			"serial_number": "XY-003",
			"name": "Access Point",
			"user": {"email": "charlie@example.com"},
			"edit_url": "/devices/3/edit",
			"delete_url": "/devices/3/delete"
		}),
		json!({
			"id": 4,
			"serial_number": "SN-004",
			"name": "Firewall",
			"user": {"email": "alice@example.com"},
			"edit_url": "/devices/4/edit",
			"delete_url": "/devices/4/delete"
		}),
		json!({
			"id": 5,
			"serial_number": "AB-005",
			"name": "Spare Router",
			"user": null,
			"edit_url": "/devices/5/edit",
			"delete_url": "/devices/5/delete"
		}),
	]
}

/// Registry knowing the `User` relation.
#[fixture]
pub fn registry() -> EntityRegistry {
	EntityRegistry::new().with(Entity::new("User"))
}

/// In-memory device table that records the drafts it receives.
#[fixture]
pub fn device_source(device_records: Vec<Value>) -> Arc<MemoryDataSource> {
	Arc::new(MemoryDataSource::recording(device_records))
}

/// Output cells: id, email, client-rendered placeholder, action links.
pub fn device_output() -> Vec<OutputSpec> {
	vec![
		OutputSpec::field("id"),
		OutputSpec::field("user.email"),
		OutputSpec::null(),
		OutputSpec::group(["edit_url", "delete_url"]),
	]
}

/// Default options for the device table.
pub fn device_options() -> QueryOptions {
	QueryOptions::new()
		.search_fields(["serial_number", "user.email", "name"])
		.output(device_output())
}

/// Builds a device handler over `source` with the given options.
pub fn device_handler_with(
	source: Arc<MemoryDataSource>,
	registry: EntityRegistry,
	options: QueryOptions,
) -> TableDrawHandler {
	TableDrawHandler::build(
		ColumnSpec::new(COLUMNS),
		DataSourceDescriptor::new(source).include(Entity::new("User")),
		registry,
		options,
	)
}

/// Device handler with default options.
#[fixture]
pub fn device_handler(
	device_source: Arc<MemoryDataSource>,
	registry: EntityRegistry,
) -> (TableDrawHandler, Arc<MemoryDataSource>) {
	let handler = device_handler_with(device_source.clone(), registry, device_options());
	(handler, device_source)
}

/// Extracts the id cell of every row.
pub fn ids(response: &DrawResponse) -> Vec<i64> {
	response
		.data
		.iter()
		.filter_map(|row| row.first().and_then(Value::as_i64))
		.collect()
}
