//! Gap closing: connect dangling endpoints (degree 1, post-snap) to their
//! nearest dangling partners within an effective, layer-aware tolerance
//! (spec.md §4.3). New segments are tagged `layer = "AUTO_CLOSE"`,
//! `entity_type = Bridge`.

use std::collections::{HashMap, HashSet};

use core_config::tolerance_for_layer;
use core_model::{EntityType, Point, Segment};

use crate::grid::UniformGrid;

const AUTO_CLOSE_LAYER: &str = "AUTO_CLOSE";

#[derive(Clone, Copy)]
struct Endpoint {
    point: Point,
    segment_idx: usize,
    tolerance: f64,
}

pub fn close_gaps(segments: Vec<Segment>, default_tolerance: f64) -> Vec<Segment> {
    if segments.is_empty() {
        return segments;
    }

    let mut degree: HashMap<(i64, i64), usize> = HashMap::new();
    for s in &segments {
        *degree.entry(s.start.rounded_key()).or_insert(0) += 1;
        *degree.entry(s.end.rounded_key()).or_insert(0) += 1;
    }

    let mut existing_edges: HashSet<((i64, i64), (i64, i64))> = HashSet::new();
    for s in &segments {
        existing_edges.insert(edge_key(s.start.rounded_key(), s.end.rounded_key()));
    }

    let mut dangling: Vec<Endpoint> = Vec::new();
    for (idx, s) in segments.iter().enumerate() {
        let tolerance = tolerance_for_layer(&s.layer, default_tolerance);
        if degree.get(&s.start.rounded_key()).copied().unwrap_or(0) == 1 {
            dangling.push(Endpoint {
                point: s.start,
                segment_idx: idx,
                tolerance,
            });
        }
        if degree.get(&s.end.rounded_key()).copied().unwrap_or(0) == 1 {
            dangling.push(Endpoint {
                point: s.end,
                segment_idx: idx,
                tolerance,
            });
        }
    }

    let points: Vec<Point> = dangling.iter().map(|e| e.point).collect();
    let max_tolerance = dangling.iter().map(|e| e.tolerance).fold(default_tolerance, f64::max);
    let grid = UniformGrid::build(&points, max_tolerance.max(default_tolerance));

    let mut bridges = Vec::new();
    let mut connected: HashSet<(i64, i64)> = HashSet::new();

    for (i, a) in dangling.iter().enumerate() {
        let a_key = a.point.rounded_key();
        let mut candidates: Vec<(f64, usize)> = grid
            .neighbors(&a.point)
            .into_iter()
            .filter(|&j| j != i)
            .filter_map(|j| {
                let b = &dangling[j];
                if b.segment_idx == a.segment_idx {
                    return None;
                }
                let b_key = b.point.rounded_key();
                let effective = a.tolerance.max(b.tolerance);
                let dist = a.point.distance_to(&b.point);
                if dist <= effective
                    && !existing_edges.contains(&edge_key(a_key, b_key))
                    && !connected.contains(&pair_id(a_key, b_key))
                {
                    Some((dist, j))
                } else {
                    None
                }
            })
            .collect();

        candidates.sort_by(|l, r| l.0.partial_cmp(&r.0).unwrap());
        for (_, j) in candidates.into_iter().take(2) {
            let b = &dangling[j];
            let b_key = b.point.rounded_key();
            connected.insert(pair_id(a_key, b_key));
            if a.point != b.point {
                bridges.push(Segment::new(a.point, b.point, AUTO_CLOSE_LAYER, EntityType::Bridge));
            }
        }
    }

    let mut out = segments;
    out.extend(bridges);
    out
}

fn edge_key(a: (i64, i64), b: (i64, i64)) -> ((i64, i64), (i64, i64)) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn pair_id(a: (i64, i64), b: (i64, i64)) -> (i64, i64) {
    // Collapse an unordered pair of grid keys into a single symmetric id.
    let (lo, hi) = edge_key(a, b);
    (lo.0.wrapping_mul(1_000_003) ^ lo.1, hi.0.wrapping_mul(1_000_003) ^ hi.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), "0", EntityType::Line)
    }

    #[test]
    fn small_gap_closes_at_default_tolerance() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(1.03, 0.0, 2.0, 0.0)];
        let out = close_gaps(segments, 0.05);
        assert!(out.iter().any(|s| s.entity_type == EntityType::Bridge));
    }

    #[test]
    fn wide_gap_stays_open_at_tight_tolerance() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(1.5, 0.0, 2.0, 0.0)];
        let out = close_gaps(segments, 0.01);
        assert!(!out.iter().any(|s| s.entity_type == EntityType::Bridge));
    }
}
