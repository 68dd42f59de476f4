//! Block reference explosion: recursively flatten INSERT entities into the
//! primitives they represent, composing the full 2D affine transform
//! (rotation, non-uniform scale, translation) from outer block to inner
//! (spec.md §4.1). Recursion is capped at depth 10 to guard against cyclic
//! or pathological block definitions.

use std::collections::HashMap;

use dxf::entities::{Entity, EntityType as DxfEntityType};
use dxf::Drawing;

use core_model::{Point, Transform};

use crate::convert::{convert_entity, record_block_reference};
use crate::raw::RawExtraction;

const MAX_EXPLOSION_DEPTH: usize = 10;

pub struct BlockDef<'a> {
    pub entities: &'a [Entity],
}

pub fn collect_block_defs(drawing: &Drawing) -> HashMap<String, BlockDef<'_>> {
    drawing
        .blocks()
        .map(|block| {
            (
                block.name.clone(),
                BlockDef {
                    entities: &block.entities,
                },
            )
        })
        .collect()
}

/// Walk every top-level entity, exploding INSERTs recursively and
/// converting everything else in place.
pub fn explode_entities<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    block_defs: &HashMap<String, BlockDef<'a>>,
    out: &mut RawExtraction,
) {
    for entity in entities {
        explode_one(entity, &Transform::identity(), block_defs, 0, out);
    }
}

fn explode_one(
    entity: &Entity,
    inherited: &Transform,
    block_defs: &HashMap<String, BlockDef<'_>>,
    depth: usize,
    out: &mut RawExtraction,
) {
    if let DxfEntityType::Insert(insert) = &entity.specific {
        let local = Transform::from_scale_rotation(
            insert.x_scale_factor,
            insert.y_scale_factor,
            insert.rotation.to_radians(),
            Point::new(insert.location.x, insert.location.y),
        );
        let composed = local.then(inherited);

        record_block_reference(&insert.name, &entity.common.layer, composed, out);

        if depth >= MAX_EXPLOSION_DEPTH {
            out.unsupported_entities
                .push(format!("insert explosion depth exceeded for block {}", insert.name));
            return;
        }

        if let Some(def) = block_defs.get(&insert.name) {
            for child in def.entities {
                explode_one(child, &composed, block_defs, depth + 1, out);
            }
        }
        return;
    }

    convert_entity(entity, &entity.common.layer, inherited, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_composition_is_identity() {
        let a = Transform::identity();
        let b = Transform::identity();
        let composed = a.then(&b);
        let p = composed.apply(Point::new(3.0, 4.0));
        assert!((p.x - 3.0).abs() < 1e-9);
        assert!((p.y - 4.0).abs() < 1e-9);
    }
}
