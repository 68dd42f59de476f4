//! Arc and circle chord approximation (spec.md §4.1). Both counts are
//! driven by a fixed 0.1 m step so that denser chords are used on larger
//! curves regardless of their units (callers pass radius and angles in the
//! drawing's raw units; scaling to meters happens later in the pipeline).

use core_model::Point;

const CHORD_STEP: f64 = 0.1;

/// Chord vertices (inclusive of both endpoints) approximating an arc from
/// `start_angle` to `end_angle` (radians, CCW) on a circle of `radius`
/// centered at `center`.
pub fn arc_chords(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Vec<Point> {
    let mut sweep = end_angle - start_angle;
    while sweep < 0.0 {
        sweep += std::f64::consts::TAU;
    }
    let arc_length = radius * sweep;
    let n = (8usize).max((arc_length / CHORD_STEP).ceil() as usize);

    (0..=n)
        .map(|i| {
            let t = start_angle + sweep * (i as f64 / n as f64);
            Point::new(center.x + radius * t.cos(), center.y + radius * t.sin())
        })
        .collect()
}

/// Chord vertices approximating a full circle; the returned ring is closed
/// (first point repeated at the end) so callers can treat it uniformly with
/// other closed boundaries.
pub fn circle_chords(center: Point, radius: f64) -> Vec<Point> {
    let circumference = std::f64::consts::TAU * radius;
    let n = (16usize).max((circumference / CHORD_STEP).ceil() as usize);
    (0..=n)
        .map(|i| {
            let t = std::f64::consts::TAU * (i as f64 / n as f64);
            Point::new(center.x + radius * t.cos(), center.y + radius * t.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_arc_still_gets_minimum_chord_count() {
        let pts = arc_chords(Point::new(0.0, 0.0), 1.0, 0.0, 0.1);
        assert_eq!(pts.len(), 9); // 8 chords -> 9 vertices
    }

    #[test]
    fn long_arc_scales_chord_count_with_length() {
        let pts = arc_chords(Point::new(0.0, 0.0), 100.0, 0.0, std::f64::consts::PI);
        // arc_length = 100*pi ~= 314.16, step 0.1 -> >=3142 chords
        assert!(pts.len() > 3000);
    }

    #[test]
    fn circle_closes_the_ring() {
        let pts = circle_chords(Point::new(0.0, 0.0), 1.0);
        assert!((pts.first().unwrap().x - pts.last().unwrap().x).abs() < 1e-9);
        assert!((pts.first().unwrap().y - pts.last().unwrap().y).abs() < 1e-9);
    }
}
