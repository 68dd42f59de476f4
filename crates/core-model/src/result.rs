//! The top-level output of an `analyze()` run.

use crate::block::BlockMetadata;
use crate::matching::{Match, UnmatchedItem};
use crate::region::Region;

/// Dominant drawn orientation of a layer, used to sanity-check whether a
/// wall-ish layer is actually horizontal (a plan-view slab) or vertical
/// (an elevation), grounded in the original's layer statistics pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOrientation {
    Horizontal,
    Vertical,
    Mixed,
    Unknown,
}

/// Per-layer statistics gathered while parsing, independent of whether the
/// layer survived whitelist filtering.
#[derive(Debug, Clone)]
pub struct LayerMetadata {
    pub name: String,
    pub entity_count: usize,
    pub orientation: LayerOrientation,
    pub included: bool,
}

/// Which length unit the drawing was inferred to use, and how sure the
/// inference was (spec.md §4.1, labels per spec.md §6/§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitConfidence {
    High,
    Medium,
    Low,
}

impl UnitConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitConfidence::High => "High",
            UnitConfidence::Medium => "Medium",
            UnitConfidence::Low => "Low",
        }
    }
}

/// Everything a single `analyze()` invocation produces.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub regions: Vec<Region>,
    pub matches: Vec<Match>,
    pub unmatched: Vec<UnmatchedItem>,
    pub warnings: Vec<String>,
    pub detected_unit: String,
    pub unit_confidence: UnitConfidence,
    pub unit_factor: f64,
    pub layer_metadata: Vec<LayerMetadata>,
    pub block_metadata: Vec<BlockMetadata>,
    pub processing_time_ms: u128,
}

impl AnalysisResult {
    pub fn matches_requiring_review(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.requires_review())
    }
}
