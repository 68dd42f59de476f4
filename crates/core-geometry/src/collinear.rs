//! Collinear chain merging: BFS through segments sharing an exact endpoint
//! (post-snap) whose direction agrees within `angle_tolerance` (mod pi),
//! replacing each chain by the segment spanning its extreme projections
//! (spec.md §4.3).

use std::collections::HashMap;

use core_model::{Point, Segment};

/// Angle difference between two directions, collapsed into `0..=pi/2` so
/// that a segment and its reverse compare as identical direction.
fn angle_diff_mod_pi(a: f64, b: f64) -> f64 {
    let mut d = (a - b).abs() % std::f64::consts::PI;
    if d > std::f64::consts::PI / 2.0 {
        d = std::f64::consts::PI - d;
    }
    d
}

pub fn merge_collinear(segments: Vec<Segment>, angle_tolerance: f64) -> Vec<Segment> {
    if segments.is_empty() {
        return segments;
    }

    let mut by_endpoint: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (idx, s) in segments.iter().enumerate() {
        by_endpoint.entry(s.start.rounded_key()).or_default().push(idx);
        by_endpoint.entry(s.end.rounded_key()).or_default().push(idx);
    }

    let mut visited = vec![false; segments.len()];
    let mut output = Vec::new();

    for start_idx in 0..segments.len() {
        if visited[start_idx] {
            continue;
        }
        let mut chain = vec![start_idx];
        visited[start_idx] = true;
        let mut frontier = vec![start_idx];
        let base_angle = segments[start_idx].angle();

        while let Some(cur) = frontier.pop() {
            let cur_seg = &segments[cur];
            for endpoint in [cur_seg.start.rounded_key(), cur_seg.end.rounded_key()] {
                if let Some(candidates) = by_endpoint.get(&endpoint) {
                    for &cand in candidates {
                        if visited[cand] {
                            continue;
                        }
                        let cand_seg = &segments[cand];
                        if angle_diff_mod_pi(cand_seg.angle(), base_angle) <= angle_tolerance {
                            visited[cand] = true;
                            chain.push(cand);
                            frontier.push(cand);
                        }
                    }
                }
            }
        }

        if chain.len() == 1 {
            output.push(segments[start_idx].clone());
            continue;
        }

        output.push(merge_chain(&segments, &chain, base_angle));
    }

    output
}

fn merge_chain(segments: &[Segment], chain: &[usize], base_angle: f64) -> Segment {
    let (dir_x, dir_y) = base_angle.sin_cos();
    let (dir_x, dir_y) = (dir_y, dir_x); // cos, sin -> unit direction vector

    let mut min_proj = f64::INFINITY;
    let mut max_proj = f64::NEG_INFINITY;
    let mut min_point = segments[chain[0]].start;
    let mut max_point = segments[chain[0]].start;
    let mut layers = Vec::new();

    let origin = segments[chain[0]].start;
    let project = |p: Point| (p.x - origin.x) * dir_x + (p.y - origin.y) * dir_y;

    for &idx in chain {
        let seg = &segments[idx];
        layers.extend(seg.contributor_layers.iter().cloned());
        for p in [seg.start, seg.end] {
            let proj = project(p);
            if proj < min_proj {
                min_proj = proj;
                min_point = p;
            }
            if proj > max_proj {
                max_proj = proj;
                max_point = p;
            }
        }
    }

    dedup_preserve_order(&mut layers);
    Segment::new_merged(min_point, max_point, layers)
}

fn dedup_preserve_order(layers: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    layers.retain(|l| seen.insert(l.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64, layer: &str) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), layer, EntityType::Line)
    }

    #[test]
    fn collinear_chain_merges_into_one_segment() {
        let segments = vec![
            seg(0.0, 0.0, 1.0, 0.0, "a"),
            seg(1.0, 0.0, 2.0, 0.0, "b"),
            seg(2.0, 0.0, 3.0, 0.0, "a"),
        ];
        let out = merge_collinear(segments, 0.5_f64.to_radians());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_type, EntityType::Merged);
        assert!(out[0].contributor_layers.contains(&"a".to_string()));
        assert!(out[0].contributor_layers.contains(&"b".to_string()));
        assert!((out[0].length() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn non_collinear_segments_stay_separate() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0, "a"), seg(1.0, 0.0, 1.0, 1.0, "a")];
        let out = merge_collinear(segments, 0.5_f64.to_radians());
        assert_eq!(out.len(), 2);
    }
}
