//! R-tree spatial index over extracted regions (spec.md §4.6). Bulk-loaded
//! once per `analyze()` run; exact geometric tests (point-in-polygon,
//! polygon distance) are applied only to the R-tree's candidate set so the
//! index itself only ever has to reason about bounding boxes.

use core_model::{Point, Region};
use geo::{Contains, LineString, Polygon};
use rstar::{RTree, RTreeObject, AABB};

/// An axis-aligned query window, in meters.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub min: Point,
    pub max: Point,
}

impl Envelope {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    fn to_aabb(self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min.x, self.min.y], [self.max.x, self.max.y])
    }
}

struct Entry {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// A bulk-loaded spatial index over a borrowed slice of regions. Regions are
/// never mutated or reordered once indexed; the index is built fresh after
/// each stage that changes the region set (region extraction, then again
/// after multi-resolution merge).
pub struct RegionIndex<'a> {
    regions: &'a [Region],
    tree: RTree<Entry>,
    polygons: Vec<Polygon<f64>>,
}

impl<'a> RegionIndex<'a> {
    pub fn build(regions: &'a [Region]) -> Self {
        let polygons: Vec<Polygon<f64>> = regions.iter().map(|r| to_geo_polygon(&r.boundary)).collect();
        let entries: Vec<Entry> = regions
            .iter()
            .enumerate()
            .map(|(index, r)| Entry {
                index,
                envelope: bbox_of(&r.boundary),
            })
            .collect();
        let tree = RTree::bulk_load(entries);
        Self { regions, tree, polygons }
    }

    /// The smallest-area region strictly containing `point`, or `None`.
    pub fn contains(&self, point: Point) -> Option<&'a Region> {
        let query = AABB::from_point([point.x, point.y]);
        let mut best: Option<(usize, f64)> = None;
        for entry in self.tree.locate_in_envelope_intersecting(&query) {
            let idx = entry.index;
            if self.polygons[idx].contains(&geo::Point::new(point.x, point.y)) {
                let area = self.regions[idx].area;
                if best.map(|(_, best_area)| area < best_area).unwrap_or(true) {
                    best = Some((idx, area));
                }
            }
        }
        best.map(|(idx, _)| &self.regions[idx])
    }

    /// The nearest region to `point` whose polygon distance is within
    /// `max_distance`, or `None`.
    pub fn nearest(&self, point: Point, max_distance: f64) -> Option<&'a Region> {
        let mut best: Option<(usize, f64)> = None;
        for entry in self.tree.nearest_neighbor_iter(&[point.x, point.y]) {
            let idx = entry.index;
            let envelope_dist = envelope_point_distance(&entry.envelope, point);
            if let Some((_, best_dist)) = best {
                if envelope_dist > best_dist {
                    // No later candidate's envelope (ascending by envelope
                    // distance) can beat the polygon distance already found.
                    break;
                }
            }
            if envelope_dist > max_distance && best.is_none() {
                continue;
            }
            let dist = distance_to_polygon(point, &self.regions[idx].boundary);
            if dist <= max_distance && best.map(|(_, best_dist)| dist < best_dist).unwrap_or(true) {
                best = Some((idx, dist));
            }
        }
        best.map(|(idx, _)| &self.regions[idx])
    }

    /// All regions whose bounding box intersects `envelope`.
    pub fn query(&self, envelope: Envelope) -> impl Iterator<Item = &'a Region> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&envelope.to_aabb())
            .map(move |entry| &self.regions[entry.index])
    }
}

fn bbox_of(boundary: &[Point]) -> AABB<[f64; 2]> {
    let mut min = [f64::INFINITY, f64::INFINITY];
    let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
    for p in boundary {
        min[0] = min[0].min(p.x);
        min[1] = min[1].min(p.y);
        max[0] = max[0].max(p.x);
        max[1] = max[1].max(p.y);
    }
    AABB::from_corners(min, max)
}

fn to_geo_polygon(boundary: &[Point]) -> Polygon<f64> {
    let mut coords: Vec<geo::Coord<f64>> = boundary.iter().map(|p| geo::coord! { x: p.x, y: p.y }).collect();
    if coords.first() != coords.last() {
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
    }
    Polygon::new(LineString::new(coords), vec![])
}

fn envelope_point_distance(envelope: &AABB<[f64; 2]>, point: Point) -> f64 {
    let lower = envelope.lower();
    let upper = envelope.upper();
    let dx = (lower[0] - point.x).max(0.0).max(point.x - upper[0]);
    let dy = (lower[1] - point.y).max(0.0).max(point.y - upper[1]);
    dx.hypot(dy)
}

/// Minimum distance from `point` to the polygon boundary, 0.0 when the point
/// is inside. Hand-rolled (rather than pulled from `geo`) so this crate only
/// leans on `geo` for the one containment predicate it needs.
fn distance_to_polygon(point: Point, boundary: &[Point]) -> f64 {
    if boundary.len() < 2 {
        return f64::INFINITY;
    }
    let geo_poly = to_geo_polygon(boundary);
    if geo_poly.contains(&geo::Point::new(point.x, point.y)) {
        return 0.0;
    }
    let mut best = f64::INFINITY;
    for i in 0..boundary.len() {
        let a = boundary[i];
        let b = boundary[(i + 1) % boundary.len()];
        let d = point.distance_to(&closest_point_on_segment(point, a, b));
        if d < best {
            best = d;
        }
    }
    best
}

fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    if len2 <= f64::EPSILON {
        return a;
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    Point::new(a.x + t * abx, a.y + t * aby)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{RegionKind, Resolution, SemanticClass};

    fn square_region(id: u64, min: (f64, f64), side: f64) -> Region {
        let (x, y) = min;
        Region {
            id,
            boundary: vec![
                Point::new(x, y),
                Point::new(x + side, y),
                Point::new(x + side, y + side),
                Point::new(x, y + side),
            ],
            area: side * side,
            perimeter: side * 4.0,
            centroid: Point::new(x + side / 2.0, y + side / 2.0),
            kind: RegionKind::Extracted,
            resolution: Resolution::Coarse,
            source_layers: vec!["a".into()],
            semantic_class: SemanticClass::Unknown,
            associated_text: vec![],
        }
    }

    #[test]
    fn contains_finds_the_smaller_of_two_nested_regions() {
        let regions = vec![square_region(1, (0.0, 0.0), 10.0), square_region(2, (2.0, 2.0), 2.0)];
        let index = RegionIndex::build(&regions);
        let found = index.contains(Point::new(3.0, 3.0)).unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn contains_is_none_outside_every_region() {
        let regions = vec![square_region(1, (0.0, 0.0), 2.0)];
        let index = RegionIndex::build(&regions);
        assert!(index.contains(Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn nearest_respects_max_distance() {
        let regions = vec![square_region(1, (0.0, 0.0), 2.0)];
        let index = RegionIndex::build(&regions);
        assert!(index.nearest(Point::new(2.1, 1.0), 0.5).is_some());
        assert!(index.nearest(Point::new(10.0, 10.0), 0.5).is_none());
    }

    #[test]
    fn query_returns_overlapping_regions_only() {
        let regions = vec![square_region(1, (0.0, 0.0), 2.0), square_region(2, (100.0, 100.0), 2.0)];
        let index = RegionIndex::build(&regions);
        let hits: Vec<&Region> = index.query(Envelope::new(Point::new(-1.0, -1.0), Point::new(3.0, 3.0))).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }
}
