//! Compile-time keyword/synonym/tolerance tables, plus optional TOML
//! overrides for `core_model::Options`.

pub mod category;
pub mod layer_tolerance;
pub mod synonyms;

use std::path::Path;

use core_model::Options;
use serde::Deserialize;

pub use category::{all_categories, CategorySpec};
pub use layer_tolerance::{force_close_table, tolerance_for_layer};
pub use synonyms::{synonym_table, synonyms_of};

/// Runtime-tunable overrides for a single deployment, layered on top of
/// `Options::default()`. Any field left out of the TOML file keeps the
/// default; unknown fields are ignored so that older override files remain
/// valid as new options are added.
#[derive(Debug, Default, Deserialize)]
pub struct MatcherConfigOverrides {
    pub snap_tolerance: Option<f64>,
    pub collinear_angle_tolerance: Option<f64>,
    pub max_gap: Option<f64>,
    pub merge_collinear: Option<bool>,
    pub close_gaps: Option<bool>,
    pub undershoot_tolerance: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub max_segments: Option<usize>,
    pub text_match_threshold: Option<f64>,
    pub spatial_search_radius: Option<f64>,
    pub default_wall_height: Option<f64>,
    pub use_llm_fallback: Option<bool>,
    pub layer_whitelist: Option<Vec<String>>,
    pub multi_resolution: Option<bool>,
    pub deadline_secs: Option<u64>,
    pub review_threshold: Option<f64>,
}

/// The fully-resolved configuration for one `analyze()` run: the keyword
/// tables (fixed) plus an `Options` that may have been overridden from a
/// TOML file.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub options: Options,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            options: Options::default(),
        }
    }
}

impl MatcherConfig {
    /// Load an optional TOML override file and apply it on top of
    /// `Options::default()`. A missing file is not an error: callers are
    /// expected to ship one only for project-specific tuning.
    pub fn load_overrides(path: impl AsRef<Path>) -> anyhow::Result<MatcherConfig> {
        let path = path.as_ref();
        let mut options = Options::default();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config override file, using defaults");
            return Ok(MatcherConfig { options });
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config override {}: {e}", path.display()))?;
        let overrides: MatcherConfigOverrides = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing config override {}: {e}", path.display()))?;

        if let Some(v) = overrides.snap_tolerance {
            options.snap_tolerance = v;
        }
        if let Some(v) = overrides.collinear_angle_tolerance {
            options.collinear_angle_tolerance = v;
        }
        if let Some(v) = overrides.max_gap {
            options.max_gap = v;
        }
        if let Some(v) = overrides.merge_collinear {
            options.merge_collinear = v;
        }
        if let Some(v) = overrides.close_gaps {
            options.close_gaps = v;
        }
        if let Some(v) = overrides.undershoot_tolerance {
            options.undershoot_tolerance = v;
        }
        if let Some(v) = overrides.min_area {
            options.min_area = v;
        }
        if let Some(v) = overrides.max_area {
            options.max_area = v;
        }
        if let Some(v) = overrides.max_segments {
            options.max_segments = v;
        }
        if let Some(v) = overrides.text_match_threshold {
            options.text_match_threshold = v;
        }
        if let Some(v) = overrides.spatial_search_radius {
            options.spatial_search_radius = v;
        }
        if let Some(v) = overrides.default_wall_height {
            options.default_wall_height = v;
        }
        if let Some(v) = overrides.use_llm_fallback {
            options.use_llm_fallback = v;
        }
        if let Some(v) = overrides.layer_whitelist {
            options.layer_whitelist = v;
        }
        if let Some(v) = overrides.multi_resolution {
            options.multi_resolution = v;
        }
        if let Some(secs) = overrides.deadline_secs {
            options.deadline = Some(std::time::Duration::from_secs(secs));
        }
        if let Some(v) = overrides.review_threshold {
            options.review_threshold = v;
        }

        tracing::info!(path = %path.display(), "applied config overrides");
        Ok(MatcherConfig { options })
    }

    pub fn is_whitelisted_layer(&self, layer: &str) -> bool {
        let lower = layer.to_lowercase();
        self.options
            .layer_whitelist
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
    }
}
