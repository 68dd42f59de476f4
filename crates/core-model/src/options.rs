//! Entry-point configuration for a single `analyze()` run. Field set and
//! defaults mirror spec.md §6 exactly; `core-config::MatcherConfig` can
//! layer a TOML override on top of `Options::default()` before a run.

use std::time::Duration;

/// A user-supplied hint about the drawing's native unit, used by the unit
/// inferencer when the DXF header doesn't declare one (spec.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitHint {
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
}

impl UnitHint {
    pub fn parse(raw: &str) -> Option<UnitHint> {
        match raw.trim().to_lowercase().as_str() {
            "mm" => Some(UnitHint::Millimeters),
            "cm" => Some(UnitHint::Centimeters),
            "m" => Some(UnitHint::Meters),
            "in" => Some(UnitHint::Inches),
            "ft" => Some(UnitHint::Feet),
            _ => None,
        }
    }

    /// Factor to convert a coordinate in this unit into meters.
    pub fn meters_factor(&self) -> f64 {
        match self {
            UnitHint::Millimeters => 0.001,
            UnitHint::Centimeters => 0.01,
            UnitHint::Meters => 1.0,
            UnitHint::Inches => 0.0254,
            UnitHint::Feet => 0.3048,
        }
    }
}

/// Tunable knobs for one pipeline run. Defaults match spec.md §6.
#[derive(Debug, Clone)]
pub struct Options {
    /// User-supplied unit hint, consulted when the DXF header is unitless.
    pub hint_unit: Option<UnitHint>,
    /// Vertex snap tolerance, in meters, after unit normalization.
    pub snap_tolerance: f64,
    /// Angular tolerance (radians) for collinear segment merging (spec: 0.5°).
    pub collinear_angle_tolerance: f64,
    /// Default gap-closing distance, in meters; per-layer tolerances from
    /// `core-config::layer_tolerance` take precedence when they match.
    pub max_gap: f64,
    /// Whether the collinear-merge pass runs.
    pub merge_collinear: bool,
    /// Whether the gap-closing pass runs.
    pub close_gaps: bool,
    /// Undershoot (T-junction) snap distance, in meters.
    pub undershoot_tolerance: f64,
    /// Minimum accepted region area, in square meters.
    pub min_area: f64,
    /// Maximum accepted region area, in square meters.
    pub max_area: f64,
    /// Hard cap on whitelisted segments before uniform subsampling kicks in.
    pub max_segments: usize,
    /// Minimum semantic-matcher score for a label candidate to be returned.
    pub text_match_threshold: f64,
    /// Radius, in meters, for the nearest-neighbor spatial strategy.
    pub spatial_search_radius: f64,
    /// Fallback wall height, in meters, used by the linear-to-area quantity
    /// rule when no `H=` label is found nearby.
    pub default_wall_height: f64,
    /// Whether the (optional, non-deterministic) LLM fallback strategy may
    /// run in the semantic matcher.
    pub use_llm_fallback: bool,
    /// Whitelist of layer-name substrings considered architectural.
    pub layer_whitelist: Vec<String>,
    /// Whether the multi-resolution extractor's medium/fine passes run, or
    /// only the coarse pass.
    pub multi_resolution: bool,
    /// Soft wall-clock budget for the whole run.
    pub deadline: Option<Duration>,
    /// Minimum confidence below which a match is flagged for review.
    pub review_threshold: f64,
}

impl Options {
    pub fn close_gaps_enabled(&self) -> bool {
        self.close_gaps
    }

    pub fn undershoot_tolerance(&self) -> f64 {
        self.undershoot_tolerance
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            hint_unit: None,
            snap_tolerance: 0.01,
            collinear_angle_tolerance: 0.5_f64.to_radians(),
            max_gap: 0.05,
            merge_collinear: true,
            close_gaps: true,
            undershoot_tolerance: 0.15,
            min_area: 0.5,
            max_area: 1_000_000.0,
            max_segments: 200_000,
            text_match_threshold: 0.5,
            spatial_search_radius: 2.0,
            default_wall_height: 2.4,
            use_llm_fallback: false,
            layer_whitelist: vec![
                "arq".into(),
                "mb".into(),
                "mu".into(),
                "tab".into(),
                "pu".into(),
                "ven".into(),
                "muro".into(),
                "wall".into(),
                "door".into(),
                "window".into(),
                "partition".into(),
                "room".into(),
                "space".into(),
                "boundary".into(),
            ],
            multi_resolution: true,
            deadline: Some(Duration::from_secs(60)),
            review_threshold: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_hint_parses_known_strings() {
        assert_eq!(UnitHint::parse("MM"), Some(UnitHint::Millimeters));
        assert_eq!(UnitHint::parse("unknown"), None);
    }

    #[test]
    fn default_matches_spec_defaults() {
        let options = Options::default();
        assert_eq!(options.snap_tolerance, 0.01);
        assert_eq!(options.max_gap, 0.05);
        assert_eq!(options.undershoot_tolerance, 0.15);
        assert_eq!(options.min_area, 0.5);
        assert_eq!(options.max_area, 1_000_000.0);
        assert_eq!(options.max_segments, 200_000);
    }
}
