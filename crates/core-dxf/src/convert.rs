//! Entity-to-primitive conversion (spec.md §4.1, "Primitive conversion
//! (exact)"). Each function takes an already-composed block transform so
//! the same code path serves both top-level entities and exploded block
//! geometry; z-orientation signal is read from the raw dxf coordinates
//! before they are flattened to 2D.

use dxf::entities::{Entity, EntityType as DxfEntityType};
use dxf::Point as DxfPoint;

use core_model::{BlockReference, EntityType, HatchRegion, Point, Segment, TextBlock, Transform};

use crate::chords::{arc_chords, circle_chords};
use crate::raw::RawExtraction;

const Z_EPSILON: f64 = 1e-6;

fn apply2(transform: &Transform, p: &DxfPoint) -> Point {
    transform.apply(Point::new(p.x, p.y))
}

fn is_vertical_pair(a: &DxfPoint, b: &DxfPoint) -> bool {
    (a.z - b.z).abs() > Z_EPSILON
}

/// Convert one entity (already inside a block explosion context with
/// `transform` composed from every enclosing INSERT) into zero or more raw
/// primitives. `Insert` entities are not handled here: the caller resolves
/// them via `core_dxf::blocks` since doing so requires the block registry.
pub fn convert_entity(entity: &Entity, layer: &str, transform: &Transform, out: &mut RawExtraction) {
    match &entity.specific {
        DxfEntityType::Line(line) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, is_vertical_pair(&line.p1, &line.p2));
            let seg = Segment::new(apply2(transform, &line.p1), apply2(transform, &line.p2), layer, EntityType::Line);
            if !seg.is_zero_length() {
                out.segments.push(seg);
            }
        }
        DxfEntityType::LwPolyline(poly) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, false);
            let pts: Vec<Point> = poly
                .vertices
                .iter()
                .map(|v| transform.apply(Point::new(v.x, v.y)))
                .collect();
            push_polyline_segments(&pts, poly.is_closed(), layer, EntityType::LwPolyline, out);
        }
        DxfEntityType::Arc(arc) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, false);
            let center = Point::new(arc.center.x, arc.center.y);
            let chords = arc_chords(
                center,
                arc.radius,
                arc.start_angle.to_radians(),
                arc.end_angle.to_radians(),
            );
            let transformed: Vec<Point> = chords.into_iter().map(|p| transform.apply(p)).collect();
            push_polyline_segments(&transformed, false, layer, EntityType::ArcApprox, out);
        }
        DxfEntityType::Circle(circle) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, false);
            let center = Point::new(circle.center.x, circle.center.y);
            let chords = circle_chords(center, circle.radius);
            let transformed: Vec<Point> = chords.into_iter().map(|p| transform.apply(p)).collect();
            push_polyline_segments(&transformed, true, layer, EntityType::CircleApprox, out);
        }
        DxfEntityType::Text(text) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, false);
            out.texts.push(TextBlock::new(
                text.value.clone(),
                apply2(transform, &text.location),
                layer,
                text.text_height,
            ));
        }
        DxfEntityType::MText(mtext) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, false);
            out.texts.push(TextBlock::new(
                flatten_mtext(&mtext.text),
                apply2(transform, &mtext.insertion_point),
                layer,
                mtext.text_height,
            ));
        }
        DxfEntityType::Hatch(hatch) => {
            out.record_layer_entity(layer);
            out.record_orientation(layer, false);
            for ring in crate::hatch_boundary::boundary_rings(hatch) {
                let transformed: Vec<Point> = ring.into_iter().map(|p| transform.apply(p)).collect();
                if transformed.len() < 3 {
                    continue;
                }
                let shoelace = shoelace_area(&transformed);
                let reported = hatch.area;
                let (area, is_fallback) = if reported.abs() > 1e-9 {
                    (reported, false)
                } else {
                    (shoelace, true)
                };
                out.hatch_regions.push(HatchRegion {
                    boundary: transformed,
                    layer: layer.to_string(),
                    area,
                    area_is_shoelace_fallback: is_fallback,
                });
            }
        }
        _ => {
            out.unsupported_entities.push(format!("{:?}", entity.specific));
        }
    }
}

/// Record a top-level (non-exploded) block reference alongside the
/// exploded primitives it produced.
pub fn record_block_reference(block_name: &str, layer: &str, transform: Transform, out: &mut RawExtraction) {
    out.block_refs.push(BlockReference {
        block_name: block_name.to_string(),
        layer: layer.to_string(),
        transform,
    });
}

fn push_polyline_segments(points: &[Point], closed: bool, layer: &str, entity_type: EntityType, out: &mut RawExtraction) {
    if points.len() < 2 {
        return;
    }
    for w in points.windows(2) {
        let seg = Segment::new(w[0], w[1], layer, entity_type);
        if !seg.is_zero_length() {
            out.segments.push(seg);
        }
    }
    if closed && points.len() > 2 {
        let seg = Segment::new(points[points.len() - 1], points[0], layer, entity_type);
        if !seg.is_zero_length() {
            out.segments.push(seg);
        }
    }
}

/// MTEXT stores inline formatting codes (`\P` for paragraph breaks, `\~`
/// for non-breaking space, font/height override groups); flatten to plain
/// text the way the original's `ezdxf`-based extractor does.
fn flatten_mtext(raw: &str) -> String {
    raw.replace("\\P", "\n")
        .replace("\\~", " ")
        .split(';')
        .next_back()
        .unwrap_or(raw)
        .to_string()
}

pub fn shoelace_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    (sum / 2.0).abs()
}
