//! Item-type equivalence closure
//!
//! Every item type names up to two equivalent (parent) types. An item class
//! "has" a type when that type is reachable from its own type through these
//! links. The graph may contain cycles.

use crate::catalog::Catalog;
use crate::Result;

/// Whether item class `class` has item type `type_code`
///
/// Fails if `type_code`, or any type code reached on the way, is outside the
/// item-type table.
pub fn has_type(catalog: &Catalog, class: usize, type_code: i32) -> Result<bool> {
    catalog.item_type_index(type_code)?;
    let item = catalog.item(class)?;

    let mut visited = vec![false; catalog.item_types.len()];
    let mut pending = vec![item.item_type];

    while let Some(code) = pending.pop() {
        let index = catalog.item_type_index(code)?;
        if visited[index] {
            continue;
        }
        if code == type_code {
            return Ok(true);
        }
        visited[index] = true;

        let item_type = &catalog.item_types[index];
        pending.push(item_type.equiv1);
        pending.push(item_type.equiv2);
    }

    Ok(false)
}
