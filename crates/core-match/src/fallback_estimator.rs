//! The fallback estimator (spec §4.10a): when no real closed region exists
//! around a label, build a bounding-box "virtual region" from nearby
//! segments.

use core_model::{Point, Region, RegionKind, Resolution, Segment, SemanticClass};
use rstar::{RTree, RTreeObject, AABB};

pub const FALLBACK_LAYER: &str = "Fallback Estimation";
const MIN_SEGMENTS: usize = 3;
const MIN_AREA: f64 = 1.0;
const MAX_AREA: f64 = 1000.0;

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

pub struct SegmentProximityIndex<'a> {
    segments: &'a [Segment],
    tree: RTree<IndexedSegment>,
}

impl<'a> SegmentProximityIndex<'a> {
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

    /// Attempt to build a virtual region around `label_position` from
    /// segments within `radius` of it. Returns `None` when fewer than
    /// `MIN_SEGMENTS` qualify or the resulting bbox area is out of range.
    pub fn estimate(&self, label_position: Point, radius: f64, next_id: u64) -> Option<Region> {
        let query = AABB::from_corners(
            [label_position.x - 2.0 * radius, label_position.y - 2.0 * radius],
            [label_position.x + 2.0 * radius, label_position.y + 2.0 * radius],
        );

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut count = 0usize;

        for entry in self.tree.locate_in_envelope_intersecting(&query) {
            let seg = &self.segments[entry.idx];
            let dist = segment_distance(label_position, seg.start, seg.end);
            if dist <= radius {
                count += 1;
                for p in [seg.start, seg.end] {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
            }
        }

        if count < MIN_SEGMENTS || !min_x.is_finite() {
            return None;
        }

        let area = (max_x - min_x) * (max_y - min_y);
        if !(MIN_AREA..=MAX_AREA).contains(&area) {
            return None;
        }

        let boundary = vec![
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ];
        let perimeter = 2.0 * ((max_x - min_x) + (max_y - min_y));
        let centroid = Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

        Some(Region {
            id: next_id,
            boundary,
            area,
            perimeter,
            centroid,
            kind: RegionKind::Virtual,
            resolution: Resolution::Medium,
            source_layers: vec![FALLBACK_LAYER.to_string()],
            semantic_class: SemanticClass::Unknown,
            associated_text: Vec::new(),
        })
    }
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
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

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), "a", EntityType::Line)
    }

    #[test]
    fn three_nearby_segments_produce_a_virtual_region() {
        let segments = vec![
            seg(0.0, 0.0, 10.0, 0.0),
            seg(10.0, 0.0, 10.0, 6.0),
            seg(10.0, 6.0, 0.0, 6.0),
        ];
        let index = SegmentProximityIndex::build(&segments);
        let region = index.estimate(Point::new(5.0, 3.0), 5.0, 99).unwrap();
        assert_eq!(region.kind, RegionKind::Virtual);
        assert!((region.area - 60.0).abs() < 1e-6);
    }

    #[test]
    fn too_few_segments_yields_none() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0)];
        let index = SegmentProximityIndex::build(&segments);
        assert!(index.estimate(Point::new(0.5, 0.0), 5.0, 1).is_none());
    }
}
