//! Uniform spatial grid used by the vertex-snap pass to find nearby
//! endpoints without an all-pairs scan. Cell size is `2 * tolerance` so that
//! any two points within `tolerance` of each other fall in the same cell or
//! an adjacent one (spec.md §4.3).

use std::collections::HashMap;

use core_model::Point;

pub struct UniformGrid {
    cell_size: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl UniformGrid {
    pub fn build(points: &[Point], tolerance: f64) -> Self {
        let cell_size = (2.0 * tolerance).max(1e-9);
        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            buckets.entry(cell_of(p, cell_size)).or_default().push(idx);
        }
        Self { cell_size, buckets }
    }

    /// Indices of points in the 3x3 neighborhood of `p`'s cell.
    pub fn neighbors(&self, p: &Point) -> Vec<usize> {
        let (cx, cy) = cell_of(p, self.cell_size);
        let mut out = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.buckets.get(&(cx + dx, cy + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out
    }
}

fn cell_of(p: &Point, cell_size: f64) -> (i64, i64) {
    ((p.x / cell_size).floor() as i64, (p.y / cell_size).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_include_same_cell_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(0.001, 0.001)];
        let grid = UniformGrid::build(&points, 0.01);
        let neighbors = grid.neighbors(&points[0]);
        assert!(neighbors.contains(&0));
        assert!(neighbors.contains(&1));
    }
}
