//! Assign a face its layer by majority vote over the (possibly merged)
//! segments whose geometry falls within `boundary_buffer` of the face's
//! ring, weighted by segment length so a long wall contributes more than a
//! short stray tick mark on the same boundary.

use std::collections::HashMap;

use core_model::{Point, Segment};
use rstar::{RTree, RTreeObject, AABB};

const UNKNOWN_LAYER: &str = "Unknown";

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

pub struct SegmentIndex<'a> {
    segments: &'a [Segment],
    tree: RTree<IndexedSegment>,
}

impl<'a> SegmentIndex<'a> {
    pub fn build(segments: &'a [Segment]) -> Self {
        let entries: Vec<IndexedSegment> = segments
            .iter()
            .enumerate()
            .map(|(idx, s)| IndexedSegment {
                idx,
                envelope: AABB::from_corners(
                    [s.start.x.min(s.end.x), s.start.y.min(s.end.y)],
                    [s.start.x.max(s.end.x), s.start.y.max(s.end.y)],
                ),
            })
            .collect();
        Self { segments, tree: RTree::bulk_load(entries) }
    }

    /// Majority-vote layer for a face ring, or `"Unknown"` when no segment
    /// falls within `boundary_buffer` of the boundary.
    pub fn vote_layer(&self, ring: &[Point], boundary_buffer: f64) -> (String, Vec<String>) {
        if ring.len() < 2 {
            return (UNKNOWN_LAYER.to_string(), Vec::new());
        }
        let min_x = ring.iter().map(|p| p.x).fold(f64::INFINITY, f64::min) - boundary_buffer;
        let min_y = ring.iter().map(|p| p.y).fold(f64::INFINITY, f64::min) - boundary_buffer;
        let max_x = ring.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) + boundary_buffer;
        let max_y = ring.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max) + boundary_buffer;
        let query = AABB::from_corners([min_x, min_y], [max_x, max_y]);

        let mut weight_by_layer: HashMap<String, f64> = HashMap::new();
        let mut contributors: Vec<String> = Vec::new();

        for entry in self.tree.locate_in_envelope_intersecting(&query) {
            let seg = &self.segments[entry.idx];
            if segment_near_ring(seg.start, seg.end, ring, boundary_buffer) {
                for layer in &seg.contributor_layers {
                    *weight_by_layer.entry(layer.clone()).or_insert(0.0) += seg.length().max(1e-6);
                    if !contributors.contains(layer) {
                        contributors.push(layer.clone());
                    }
                }
            }
        }

        let winner = weight_by_layer
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .map(|(layer, _)| layer)
            .unwrap_or_else(|| UNKNOWN_LAYER.to_string());

        (winner, contributors)
    }
}

fn segment_near_ring(a: Point, b: Point, ring: &[Point], buffer: f64) -> bool {
    let n = ring.len();
    for i in 0..n {
        let (c, d) = (ring[i], ring[(i + 1) % n]);
        if segment_to_segment_distance(a, b, c, d) <= buffer {
            return true;
        }
    }
    false
}

fn segment_to_segment_distance(a: Point, b: Point, c: Point, d: Point) -> f64 {
    point_to_segment_distance(a, c, d)
        .min(point_to_segment_distance(b, c, d))
        .min(point_to_segment_distance(c, a, b))
        .min(point_to_segment_distance(d, a, b))
}

fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    if len2 <= f64::EPSILON {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * abx, a.y + t * aby);
    p.distance_to(&proj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    #[test]
    fn majority_layer_wins_by_total_length() {
        let segments = vec![
            Segment::new((0.0, 0.0).into(), (10.0, 0.0).into(), "wall", EntityType::Line),
            Segment::new((0.0, 0.0).into(), (0.0, 0.1).into(), "stray", EntityType::Line),
        ];
        let index = SegmentIndex::build(&segments);
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let (layer, contributors) = index.vote_layer(&ring, 0.05);
        assert_eq!(layer, "wall");
        assert!(contributors.contains(&"stray".to_string()));
    }

    #[test]
    fn no_nearby_segment_yields_unknown() {
        let segments = vec![Segment::new((100.0, 100.0).into(), (101.0, 100.0).into(), "far", EntityType::Line)];
        let index = SegmentIndex::build(&segments);
        let ring = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 1.0)];
        let (layer, _) = index.vote_layer(&ring, 0.05);
        assert_eq!(layer, "Unknown");
    }
}
