//! Attaches text labels to regions by containment, centroid distance, or
//! boundary distance — whichever the text satisfies first — and keeps the
//! top 10 associations per region ranked by relevance.

use core_model::{AssociatedText, Point, Region, TextBlock, TextRelationship};

const MAX_ASSOCIATIONS: usize = 10;

/// Default max distance, in meters, a text may be from a region and still
/// be associated with it.
pub const DEFAULT_MAX_DISTANCE: f64 = 5.0;

pub fn associate_texts(region: &Region, texts: &[TextBlock], max_distance: f64) -> Vec<AssociatedText> {
    let mut candidates: Vec<AssociatedText> = Vec::new();

    for text in texts {
        if point_in_polygon(text.position, &region.boundary) {
            candidates.push(AssociatedText {
                text: text.clone(),
                relationship: TextRelationship::Inside,
                distance: 0.0,
            });
            continue;
        }

        let centroid_distance = text.position.distance_to(&region.centroid);
        if centroid_distance <= max_distance {
            candidates.push(AssociatedText {
                text: text.clone(),
                relationship: TextRelationship::NearCentroid,
                distance: centroid_distance,
            });
            continue;
        }

        let boundary_distance = distance_to_boundary(text.position, &region.boundary);
        if boundary_distance <= max_distance {
            candidates.push(AssociatedText {
                text: text.clone(),
                relationship: TextRelationship::NearBoundary,
                distance: boundary_distance,
            });
        }
    }

    candidates.sort_by(|a, b| relevance(b).partial_cmp(&relevance(a)).unwrap());
    candidates.truncate(MAX_ASSOCIATIONS);
    candidates
}

fn relevance(associated: &AssociatedText) -> f64 {
    1.0 / (1.0 + associated.distance)
}

fn point_in_polygon(p: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = ring.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);
        if (yi > p.y) != (yj > p.y) {
            let x_intersect = xi + (p.y - yi) * (xj - xi) / (yj - yi);
            if p.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_boundary(p: Point, ring: &[Point]) -> f64 {
    if ring.len() < 2 {
        return f64::INFINITY;
    }
    let mut best = f64::INFINITY;
    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let d = point_to_segment_distance(p, a, b);
        if d < best {
            best = d;
        }
    }
    best
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
