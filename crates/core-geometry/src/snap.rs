//! Vertex snap: union-find endpoints within `tolerance` of each other and
//! replace each with its cluster's centroid (spec.md §4.3, §8 property 2:
//! running snap twice with the same tolerance is idempotent because the
//! second pass's clusters are already singletons).

use core_model::{Point, Segment};

use crate::grid::UniformGrid;

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Replace every segment endpoint by the centroid of the cluster of
/// endpoints within `tolerance` of one another. Segments that collapse to a
/// single point are dropped.
pub fn snap_vertices(segments: Vec<Segment>, tolerance: f64) -> Vec<Segment> {
    if segments.is_empty() {
        return segments;
    }

    let mut points = Vec::with_capacity(segments.len() * 2);
    for s in &segments {
        points.push(s.start);
        points.push(s.end);
    }

    let grid = UniformGrid::build(&points, tolerance);
    let mut uf = UnionFind::new(points.len());
    for (i, p) in points.iter().enumerate() {
        for j in grid.neighbors(p) {
            if j > i && points[i].distance_to(&points[j]) <= tolerance {
                uf.union(i, j);
            }
        }
    }

    let mut cluster_sum: std::collections::HashMap<usize, (f64, f64, usize)> =
        std::collections::HashMap::new();
    for (i, p) in points.iter().enumerate() {
        let root = uf.find(i);
        let entry = cluster_sum.entry(root).or_insert((0.0, 0.0, 0));
        entry.0 += p.x;
        entry.1 += p.y;
        entry.2 += 1;
    }

    let mut resolved: Vec<Point> = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let root = uf.find(i);
        let (sx, sy, n) = cluster_sum[&root];
        resolved.push(Point::new(sx / n as f64, sy / n as f64));
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(idx, s)| {
            Segment::new(resolved[idx * 2], resolved[idx * 2 + 1], s.layer, s.entity_type)
        })
        .filter(|s| !s.is_zero_length())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), "a", EntityType::Line)
    }

    #[test]
    fn nearby_endpoints_snap_together() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(1.003, 0.002, 2.0, 0.0)];
        let out = snap_vertices(segments, 0.01);
        assert_eq!(out[0].end, out[1].start);
    }

    #[test]
    fn snap_is_idempotent() {
        let segments = vec![seg(0.0, 0.0, 1.0, 0.0), seg(1.003, 0.002, 2.0, 0.0)];
        let once = snap_vertices(segments, 0.01);
        let twice = snap_vertices(once.clone(), 0.01);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
        }
    }

    #[test]
    fn collapsed_segment_is_dropped() {
        let segments = vec![seg(0.0, 0.0, 0.001, 0.001)];
        let out = snap_vertices(segments, 0.01);
        assert!(out.is_empty());
    }
}
