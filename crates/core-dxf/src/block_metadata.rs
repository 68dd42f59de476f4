//! Block definition metadata: bounding box and accumulated closed-geometry
//! area, computed directly from a block's own entities (spec.md §4.1,
//! "Block metadata").

use std::collections::HashMap;

use dxf::entities::EntityType as DxfEntityType;

use core_model::{BlockAreaSource, BlockMetadata, BlockReference, Point};

use crate::blocks::BlockDef;
use crate::convert::shoelace_area;
use crate::hatch_boundary::boundary_rings;

const MIN_REPORTABLE_AREA: f64 = 1e-4;

pub fn build_block_metadata(
    block_defs: &HashMap<String, BlockDef<'_>>,
    references: &[BlockReference],
) -> Vec<BlockMetadata> {
    let mut reference_counts: HashMap<&str, usize> = HashMap::new();
    for r in references {
        *reference_counts.entry(r.block_name.as_str()).or_insert(0) += 1;
    }

    let mut names: Vec<&String> = Vec::new();
    let mut by_name: HashMap<&str, &BlockDef<'_>> = HashMap::new();
    for (name, def) in block_defs {
        if name.starts_with('*') {
            continue; // anonymous blocks (dimension/hatch associative groups)
        }
        names.push(name);
        by_name.insert(name.as_str(), def);
    }
    names.sort();

    names
        .into_iter()
        .filter_map(|name| {
            let def = by_name[name.as_str()];
            let (area, source, bbox) = summarize_block(def);
            if area <= MIN_REPORTABLE_AREA {
                return None;
            }
            let (min, max) = bbox?;
            Some(BlockMetadata {
                block_name: name.clone(),
                area,
                width: max.x - min.x,
                height: max.y - min.y,
                area_source: source,
                reference_count: reference_counts.get(name.as_str()).copied().unwrap_or(0),
            })
        })
        .collect()
}

fn summarize_block(def: &BlockDef<'_>) -> (f64, BlockAreaSource, Option<(Point, Point)>) {
    let mut closed_area = 0.0;
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut any_point = false;

    let mut touch = |p: Point, min: &mut Point, max: &mut Point| {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    };

    for entity in def.entities {
        match &entity.specific {
            DxfEntityType::LwPolyline(poly) if poly.is_closed() => {
                let ring: Vec<Point> = poly.vertices.iter().map(|v| Point::new(v.x, v.y)).collect();
                closed_area += shoelace_area(&ring);
                for p in &ring {
                    touch(*p, &mut min, &mut max);
                    any_point = true;
                }
            }
            DxfEntityType::LwPolyline(poly) => {
                for v in &poly.vertices {
                    touch(Point::new(v.x, v.y), &mut min, &mut max);
                    any_point = true;
                }
            }
            DxfEntityType::Line(line) => {
                touch(Point::new(line.p1.x, line.p1.y), &mut min, &mut max);
                touch(Point::new(line.p2.x, line.p2.y), &mut min, &mut max);
                any_point = true;
            }
            DxfEntityType::Hatch(hatch) => {
                for ring in boundary_rings(hatch) {
                    let area = if hatch.area.abs() > 1e-9 {
                        hatch.area
                    } else {
                        shoelace_area(&ring)
                    };
                    closed_area += area;
                    for p in &ring {
                        touch(*p, &mut min, &mut max);
                        any_point = true;
                    }
                }
            }
            _ => {}
        }
    }

    if !any_point {
        return (0.0, BlockAreaSource::Bbox, None);
    }

    if closed_area > MIN_REPORTABLE_AREA {
        (closed_area, BlockAreaSource::Geometry, Some((min, max)))
    } else {
        let bbox_area = (max.x - min.x).max(0.0) * (max.y - min.y).max(0.0);
        (bbox_area, BlockAreaSource::Bbox, Some((min, max)))
    }
}
