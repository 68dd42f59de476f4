//! Extracted regions and the semantic classification layer built on top of
//! them.

use crate::geometry::Point;
use crate::text::AssociatedText;

/// How a region was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Closed polygon recovered from the planar line-work graph.
    Extracted,
    /// Polygon taken directly from a HATCH entity's boundary loop.
    Hatch,
    /// Synthesized by the fallback cycle-basis extractor when polygonize
    /// produced nothing usable.
    Virtual,
}

/// Coarse/medium/fine pass that produced a region, per the multi-resolution
/// extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resolution {
    Coarse,
    Medium,
    Fine,
}

/// Rule-based semantic label assigned to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticClass {
    Floor,
    Wall,
    Ceiling,
    Fixture,
    Annotation,
    Unknown,
}

impl SemanticClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticClass::Floor => "floor",
            SemanticClass::Wall => "wall",
            SemanticClass::Ceiling => "ceiling",
            SemanticClass::Fixture => "fixture",
            SemanticClass::Annotation => "annotation",
            SemanticClass::Unknown => "unknown",
        }
    }
}

/// A closed 2D area recovered from the drawing, with enough shape
/// information for downstream matching and scoring.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: u64,
    pub boundary: Vec<Point>,
    pub area: f64,
    pub perimeter: f64,
    pub centroid: Point,
    pub kind: RegionKind,
    pub resolution: Resolution,
    pub source_layers: Vec<String>,
    pub semantic_class: SemanticClass,
    pub associated_text: Vec<AssociatedText>,
}

impl Region {
    /// Ratio of the polygon's area to its convex hull's area, used by the
    /// confidence scorer's geometry-quality factor. Callers supply the hull
    /// area since `core-model` has no geometry engine dependency.
    pub fn convexity(&self, hull_area: f64) -> f64 {
        if hull_area <= 0.0 {
            0.0
        } else {
            (self.area / hull_area).min(1.0)
        }
    }

    pub fn label_candidates(&self) -> impl Iterator<Item = &str> {
        self.associated_text.iter().map(|t| t.text.content.as_str())
    }
}
