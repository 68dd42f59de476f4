//! Face validity repair and area-based admission.

use core_model::Point;
use geo::{coord, Area, BooleanOps, LineString, Polygon};

fn to_geo_polygon(ring: &[Point]) -> Polygon<f64> {
    let mut coords: Vec<geo::Coord<f64>> = ring.iter().map(|p| coord! { x: p.x, y: p.y }).collect();
    if coords.first() != coords.last() {
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
    }
    Polygon::new(LineString::new(coords), vec![])
}

fn from_geo_polygon(polygon: &Polygon<f64>) -> Vec<Point> {
    let mut ring: Vec<Point> = polygon.exterior().coords().map(|c| Point::new(c.x, c.y)).collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// A traced ring is simple when consecutive edges don't cross; cheap
/// O(n^2) check, fine at the modest vertex counts a single face produces.
fn is_simple(ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (ring[i], ring[(i + 1) % n]);
        for j in (i + 1)..n {
            if j == i || (j + 1) % n == i {
                continue;
            }
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if segments_cross(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x <= a.x.max(b.x) + 1e-9 && p.x >= a.x.min(b.x) - 1e-9 && p.y <= a.y.max(b.y) + 1e-9 && p.y >= a.y.min(b.y) - 1e-9
}

fn segments_cross(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if (o1 > 0.0) != (o2 > 0.0) && (o3 > 0.0) != (o4 > 0.0) {
        return true;
    }
    if o1.abs() < 1e-12 && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() < 1e-12 && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() < 1e-12 && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() < 1e-12 && on_segment(b1, b2, a2) {
        return true;
    }
    false
}

/// Repair a traced ring using the same trick `shapely.buffer(0)` relies on:
/// self-union of a polygon snaps out most self-intersections and restores a
/// consistent orientation. Returns `None` if the result is still invalid or
/// has non-positive area.
pub fn repair_ring(ring: &[Point]) -> Option<Vec<Point>> {
    if is_simple(ring) {
        let area = shoelace_unsigned(ring);
        if area > 0.0 {
            return Some(ring.to_vec());
        }
    }

    let polygon = to_geo_polygon(ring);
    let unioned = polygon.union(&polygon);
    let repaired = unioned.0.into_iter().max_by(|a, b| a.unsigned_area().partial_cmp(&b.unsigned_area()).unwrap())?;
    let repaired_ring = from_geo_polygon(&repaired);
    if repaired_ring.len() < 3 {
        return None;
    }
    if !is_simple(&repaired_ring) {
        return None;
    }
    if shoelace_unsigned(&repaired_ring) <= 0.0 {
        return None;
    }
    Some(repaired_ring)
}

pub fn shoelace_unsigned(ring: &[Point]) -> f64 {
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

pub fn perimeter(ring: &[Point]) -> f64 {
    if ring.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        total += a.distance_to(&b);
    }
    total
}

pub fn centroid(ring: &[Point]) -> Point {
    if ring.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = ring.len() as f64;
    let (sx, sy) = ring.iter().fold((0.0, 0.0), |(ax, ay), p| (ax + p.x, ay + p.y));
    Point::new(sx / n, sy / n)
}
