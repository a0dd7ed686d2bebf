//! Translation of client ordering into data-source ordering
//!
//! A column path with exactly two segments (`relation.field`) whose
//! relation resolves in the [`EntityRegistry`] becomes a joined order on
//! that entity. Every other path, including unresolved relations and
//! paths with more than two segments, orders by the literal path.

use crate::column::ColumnSpec;
use crate::entity::{Entity, EntityRegistry};
use crate::error::DataTableResult;
use crate::field;
use crate::request::{OrderRequest, SortDirection};
use serde::Serialize;

/// One ordering term of a query draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OrderInstruction {
	/// Order by a field of a joined entity.
	Joined {
		/// The related entity.
		entity: Entity,
		/// Field on the related entity.
		field: String,
		/// Direction.
		direction: SortDirection,
	},
	/// Order by a field path on the base entity.
	Flat {
		/// Unsplit column path.
		path: String,
		/// Direction.
		direction: SortDirection,
	},
}

impl OrderInstruction {
	/// Returns the direction of this term.
	pub fn direction(&self) -> SortDirection {
		match self {
			Self::Joined { direction, .. } | Self::Flat { direction, .. } => *direction,
		}
	}
}

/// Translates one client order entry.
///
/// # Examples
///
/// ```
/// use reinhardt_datatables::column::ColumnSpec;
/// use reinhardt_datatables::entity::{Entity, EntityRegistry};
/// use reinhardt_datatables::order::{translate_one, OrderInstruction};
/// use reinhardt_datatables::request::{OrderRequest, SortDirection};
///
/// let columns = ColumnSpec::new(["serial_number", "user.email"]);
/// let registry = EntityRegistry::new().with(Entity::new("User"));
///
/// let joined = translate_one(&columns, &registry, &OrderRequest::new(1, SortDirection::Desc)).unwrap();
/// assert!(matches!(joined, OrderInstruction::Joined { ref field, .. } if field == "email"));
///
/// let flat = translate_one(&columns, &registry, &OrderRequest::new(0, SortDirection::Asc)).unwrap();
/// assert!(matches!(flat, OrderInstruction::Flat { ref path, .. } if path == "serial_number"));
/// ```
pub fn translate_one(
	columns: &ColumnSpec,
	registry: &EntityRegistry,
	request: &OrderRequest,
) -> DataTableResult<OrderInstruction> {
	let path = columns.get(request.column)?;

	// TODO: chains like `device.owner.email` order by the literal path; decide
	// whether they should resolve through nested relations.
	if let [relation, name] = field::segments(path)[..] {
		if let Some(entity) = registry.resolve_relation(relation) {
			return Ok(OrderInstruction::Joined {
				entity: entity.clone(),
				field: name.to_string(),
				direction: request.dir,
			});
		}
	}

	Ok(OrderInstruction::Flat {
		path: path.to_string(),
		direction: request.dir,
	})
}

/// Translates every client order entry, preserving their sequence.
pub fn translate(
	columns: &ColumnSpec,
	registry: &EntityRegistry,
	requests: &[OrderRequest],
) -> DataTableResult<Vec<OrderInstruction>> {
	requests
		.iter()
		.map(|request| translate_one(columns, registry, request))
		.collect()
}
