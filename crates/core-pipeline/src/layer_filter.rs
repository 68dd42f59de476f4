//! Whitelists architectural layers and caps the surviving segment count so a
//! pathological drawing can't blow up the downstream geometry passes.
//!
//! Grounded in the original's `layer_filter.py`: substring whitelist first,
//! then uniform subsampling (not truncation) so a capped run still samples
//! the whole drawing rather than just its first N segments.

use core_config::MatcherConfig;
use core_model::Segment;

/// Keep only segments on a whitelisted layer, then uniformly subsample down
/// to `max_segments` if still over budget.
pub fn filter_segments(segments: Vec<Segment>, config: &MatcherConfig, max_segments: usize) -> (Vec<Segment>, Vec<String>) {
    let mut warnings = Vec::new();
    let total_before = segments.len();

    let mut kept: Vec<Segment> = segments.into_iter().filter(|s| config.is_whitelisted_layer(&s.layer)).collect();

    if total_before > 0 && kept.is_empty() {
        warnings.push("layer whitelist matched no segments; nothing to analyze".to_string());
    }

    if kept.len() > max_segments {
        let stride = (kept.len() as f64 / max_segments as f64).ceil() as usize;
        kept = kept.into_iter().step_by(stride.max(1)).collect();
        warnings.push(format!(
            "segment count exceeded max_segments ({max_segments}); uniformly subsampled from {} to {}",
            total_before,
            kept.len()
        ));
        tracing::debug!(stride, kept = kept.len(), "subsampled segments to stay under max_segments");
    }

    (kept, warnings)
}
