//! Entity descriptors and the relation registry
//!
//! Relations named in dotted column paths (`"user.email"`) are resolved
//! through an explicit [`EntityRegistry`] injected when a handler is built.
//! The relation segment has its first letter upper-cased before lookup,
//! so `user` resolves to the entity registered as `User`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A queryable entity, such as a model that can be joined into a draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
	name: String,
	accessor: String,
}

impl Entity {
	/// Creates an entity whose accessor is the name with a lower-cased first letter.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datatables::entity::Entity;
	///
	/// let user = Entity::new("User");
	/// assert_eq!(user.name(), "User");
	/// assert_eq!(user.accessor(), "user");
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let accessor = lc_first(&name);
		Self { name, accessor }
	}

	/// Overrides the key under which joined rows of this entity appear in
	/// fetched records.
	pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
		self.accessor = accessor.into();
		self
	}

	/// Returns the registered entity name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the record key holding this entity's joined data.
	pub fn accessor(&self) -> &str {
		&self.accessor
	}
}

/// Name-keyed lookup of the entities a table may join against.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
	entities: HashMap<String, Entity>,
}

impl EntityRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an entity under its name, replacing any previous entry.
	pub fn register(&mut self, entity: Entity) {
		self.entities.insert(entity.name().to_string(), entity);
	}

	/// Builder form of [`register`](Self::register).
	pub fn with(mut self, entity: Entity) -> Self {
		self.register(entity);
		self
	}

	/// Looks up an entity by its exact registered name.
	pub fn get(&self, name: &str) -> Option<&Entity> {
		self.entities.get(name)
	}

	/// Resolves a relation segment taken from a column path.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datatables::entity::{Entity, EntityRegistry};
	///
	/// let registry = EntityRegistry::new().with(Entity::new("User"));
	/// assert_eq!(registry.resolve_relation("user").map(|e| e.name()), Some("User"));
	/// assert!(registry.resolve_relation("order").is_none());
	/// ```
	pub fn resolve_relation(&self, relation: &str) -> Option<&Entity> {
		self.get(&uc_first(relation))
	}

	/// Number of registered entities.
	pub fn len(&self) -> usize {
		self.entities.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}
}

impl FromIterator<Entity> for EntityRegistry {
	fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
		let mut registry = Self::new();
		for entity in iter {
			registry.register(entity);
		}
		registry
	}
}

/// Upper-cases the first character of `s`.
pub fn uc_first(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn lc_first(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("user", "User")]
	#[case("User", "User")]
	#[case("orderItem", "OrderItem")]
	#[case("", "")]
	fn test_uc_first(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(uc_first(input), expected);
	}

	#[rstest]
	fn test_custom_accessor() {
		let entity = Entity::new("Owner").with_accessor("owned_by");
		assert_eq!(entity.accessor(), "owned_by");
	}

	#[rstest]
	fn test_registry_is_case_sensitive_after_capitalizing() {
		let registry: EntityRegistry = [Entity::new("User"), Entity::new("Device")]
			.into_iter()
			.collect();
		assert_eq!(registry.len(), 2);
		assert!(registry.resolve_relation("device").is_some());
		assert!(registry.resolve_relation("DEVICE").is_none());
	}
}
