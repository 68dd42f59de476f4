//! Core geometric primitives shared by every pipeline stage.

use std::hash::{Hash, Hasher};

/// Decimal places used to round coordinates for equality/hashing (0.01 mm at
/// meter scale).
const COORD_PRECISION: f64 = 100_000.0;

fn round_coord(v: f64) -> f64 {
    (v * COORD_PRECISION).round() / COORD_PRECISION
}

/// A point in meters. Equality and hashing round to 5 decimal places so that
/// points produced by independent stages (snapping, polygonize, hatch
/// parsing) compare equal when they represent the same physical vertex.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Key used for grid bucketing and graph node identity: coordinates
    /// rounded to the same precision as `PartialEq`/`Hash`.
    pub fn rounded_key(&self) -> (i64, i64) {
        (
            (round_coord(self.x) * COORD_PRECISION).round() as i64,
            (round_coord(self.y) * COORD_PRECISION).round() as i64,
        )
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.rounded_key() == other.rounded_key()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rounded_key().hash(state);
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Point::new(value.0, value.1)
    }
}

/// How a segment came to exist. `Merged` loses the original layer identity
/// for the segment itself (see `contributor_layers` on cleanup output);
/// `GapClose`/`Bridge`/`AutoClose` mark synthetic connective geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Line,
    LwPolyline,
    ArcApprox,
    CircleApprox,
    Merged,
    GapClose,
    Bridge,
    AutoClose,
}

impl EntityType {
    /// Synthetic connective geometry added by the cleanup pipeline rather
    /// than parsed from the source drawing.
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            EntityType::GapClose | EntityType::Bridge | EntityType::AutoClose
        )
    }
}

/// An ordered pair of points plus provenance. Zero-length segments are
/// invalid and must be filtered out at every stage boundary.
///
/// `contributor_layers` carries the multiset of original layers folded into
/// this segment by the collinear-merge pass (Design Note, spec.md §9): a
/// freshly parsed or cleaned segment has exactly one contributor (`layer`
/// itself); a `Merged` segment keeps all of them so the region
/// layer-assignment pass can majority-vote without re-querying geometry.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub layer: String,
    pub entity_type: EntityType,
    pub contributor_layers: Vec<String>,
}

impl Segment {
    pub fn new(start: Point, end: Point, layer: impl Into<String>, entity_type: EntityType) -> Self {
        let layer = layer.into();
        Self {
            contributor_layers: vec![layer.clone()],
            start,
            end,
            layer,
            entity_type,
        }
    }

    /// Build a merged segment carrying the multiset of layers contributed
    /// by the chain it replaces. `layer` is the first contributor, kept as
    /// the display/fallback layer.
    pub fn new_merged(start: Point, end: Point, contributor_layers: Vec<String>) -> Self {
        let layer = contributor_layers
            .first()
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        Self {
            start,
            end,
            layer,
            entity_type: EntityType::Merged,
            contributor_layers,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn is_zero_length(&self) -> bool {
        self.start == self.end
    }

    /// Angle of the segment in radians, `-pi..=pi`.
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_within_half_a_tenth_mm_are_equal() {
        let a = Point::new(1.000_001, 2.000_001);
        let b = Point::new(1.000_002, 2.000_002);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_length_segment_is_detected() {
        let p = Point::new(1.0, 1.0);
        let seg = Segment::new(p, p, "0", EntityType::Line);
        assert!(seg.is_zero_length());
        assert_eq!(seg.length(), 0.0);
    }

    #[test]
    fn angle_is_quadrant_correct() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0), "0", EntityType::Line);
        assert!((seg.angle() - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }
}
