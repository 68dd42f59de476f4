//! Undershoot (T-junction) snap: move a free endpoint onto the nearest
//! foreign segment when it falls just short of meeting it (spec.md §4.3).
//! Accepted distance range is `[1e-4, tolerance]` meters; anything closer
//! is treated as already touching, anything farther is a real gap left for
//! the gap-closer.

use core_model::{Point, Segment};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geom_util::closest_point_on_segment;

struct IndexedSegment {
    idx: usize,
    start: Point,
    end: Point,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.start.x.min(self.end.x), self.start.y.min(self.end.y)],
            [self.start.x.max(self.end.x), self.start.y.max(self.end.y)],
        )
    }
}

impl PointDistance for IndexedSegment {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = Point::new(point[0], point[1]);
        let closest = closest_point_on_segment(p, self.start, self.end);
        p.distance_to(&closest).powi(2)
    }
}

pub fn snap_undershoots(mut segments: Vec<Segment>, tolerance: f64) -> Vec<Segment> {
    if segments.len() < 2 {
        return segments;
    }

    let entries: Vec<IndexedSegment> = segments
        .iter()
        .enumerate()
        .map(|(idx, s)| IndexedSegment {
            idx,
            start: s.start,
            end: s.end,
        })
        .collect();
    let tree = RTree::bulk_load(entries);

    let mut updates: Vec<(usize, bool, Point)> = Vec::new();
    for (idx, seg) in segments.iter().enumerate() {
        for (is_start, endpoint) in [(true, seg.start), (false, seg.end)] {
            if let Some((proj, dist)) = nearest_foreign_projection(&tree, idx, endpoint) {
                if (1e-4..=tolerance).contains(&dist) {
                    updates.push((idx, is_start, proj));
                }
            }
        }
    }

    for (idx, is_start, proj) in updates {
        if is_start {
            segments[idx].start = proj;
        } else {
            segments[idx].end = proj;
        }
    }

    segments
}

fn nearest_foreign_projection(
    tree: &RTree<IndexedSegment>,
    own_idx: usize,
    point: Point,
) -> Option<(Point, f64)> {
    let mut best: Option<(Point, f64)> = None;
    for candidate in tree.nearest_neighbor_iter(&[point.x, point.y]) {
        if candidate.idx == own_idx {
            continue;
        }
        let proj = closest_point_on_segment(point, candidate.start, candidate.end);
        let dist = point.distance_to(&proj);
        best = Some((proj, dist));
        break;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), "0", EntityType::Line)
    }

    #[test]
    fn endpoint_just_short_of_a_wall_snaps_onto_it() {
        let segments = vec![seg(0.0, 0.0, 10.0, 0.0), seg(5.0, 0.05, 5.0, 5.0)];
        let out = snap_undershoots(segments, 0.15);
        assert!((out[1].start.y).abs() < 1e-9);
    }

    #[test]
    fn endpoint_far_from_anything_is_left_alone() {
        let segments = vec![seg(0.0, 0.0, 10.0, 0.0), seg(5.0, 5.0, 5.0, 10.0)];
        let out = snap_undershoots(segments, 0.15);
        assert!((out[1].start.y - 5.0).abs() < 1e-9);
    }
}
