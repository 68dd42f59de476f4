//! Segment-union preprocessing: split crossing segments at their
//! intersection point so the planar graph has a node everywhere two lines
//! actually cross, not just where their original endpoints happen to land.

use core_model::{Point, Segment};
use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{coord, Line};
use rstar::{RTree, RTreeObject, AABB};

struct IndexedSegment {
    idx: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn envelope_of(s: &Segment) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [s.start.x.min(s.end.x), s.start.y.min(s.end.y)],
        [s.start.x.max(s.end.x), s.start.y.max(s.end.y)],
    )
}

fn to_line(s: &Segment) -> Line<f64> {
    Line::new(coord! { x: s.start.x, y: s.start.y }, coord! { x: s.end.x, y: s.end.y })
}

/// Split every segment at the points where it crosses another segment in
/// the set. Segments that only touch at an already-shared endpoint are left
/// alone. Layer and entity-type metadata is copied onto each sub-segment.
pub fn split_at_intersections(segments: Vec<Segment>) -> Vec<Segment> {
    if segments.len() < 2 {
        return segments;
    }

    let entries: Vec<IndexedSegment> = segments
        .iter()
        .enumerate()
        .map(|(idx, s)| IndexedSegment { idx, envelope: envelope_of(s) })
        .collect();
    let tree = RTree::bulk_load(entries);

    // Parametric split positions (0..1 along the segment), per segment.
    let mut splits: Vec<Vec<f64>> = vec![Vec::new(); segments.len()];

    for (i, a) in segments.iter().enumerate() {
        let line_a = to_line(a);
        let candidates: Vec<usize> = tree
            .locate_in_envelope_intersecting(&envelope_of(a))
            .map(|e| e.idx)
            .filter(|&j| j > i)
            .collect();
        for j in candidates {
            let b = &segments[j];
            let line_b = to_line(b);
            match line_intersection(line_a, line_b) {
                Some(LineIntersection::SinglePoint { intersection, is_proper }) => {
                    if !is_proper {
                        continue;
                    }
                    if let Some(t) = param_on(a, intersection.x, intersection.y) {
                        splits[i].push(t);
                    }
                    if let Some(t) = param_on(b, intersection.x, intersection.y) {
                        splits[j].push(t);
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = Vec::with_capacity(segments.len());
    for (i, s) in segments.into_iter().enumerate() {
        let mut ts = splits[i].clone();
        if ts.is_empty() {
            out.push(s);
            continue;
        }
        ts.retain(|t| *t > 1e-9 && *t < 1.0 - 1e-9);
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        ts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        let mut prev = s.start;
        for t in &ts {
            let pt = lerp(s.start, s.end, *t);
            push_sub(&s, prev, pt, &mut out);
            prev = pt;
        }
        push_sub(&s, prev, s.end, &mut out);
    }
    out
}

fn push_sub(original: &Segment, start: Point, end: Point, out: &mut Vec<Segment>) {
    let mut seg = Segment::new(start, end, original.layer.clone(), original.entity_type);
    seg.contributor_layers = original.contributor_layers.clone();
    if !seg.is_zero_length() {
        out.push(seg);
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

fn param_on(s: &Segment, x: f64, y: f64) -> Option<f64> {
    let dx = s.end.x - s.start.x;
    let dy = s.end.y - s.start.y;
    let len2 = dx * dx + dy * dy;
    if len2 <= f64::EPSILON {
        return None;
    }
    Some((((x - s.start.x) * dx + (y - s.start.y) * dy) / len2).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), "a", EntityType::Line)
    }

    #[test]
    fn crossing_segments_split_at_their_intersection() {
        let segments = vec![seg(0.0, 5.0, 10.0, 5.0), seg(5.0, 0.0, 5.0, 10.0)];
        let out = split_at_intersections(segments);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|s| !s.is_zero_length()));
    }

    #[test]
    fn non_crossing_segments_are_untouched() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(5.0, 5.0, 6.0, 5.0)];
        let out = split_at_intersections(segments);
        assert_eq!(out.len(), 2);
    }
}
