//! Orchestrates one end-to-end drawing-to-bill-of-quantities run: parse,
//! filter, clean, extract regions, classify, associate text, match against
//! the bill of quantities, and assemble the final `AnalysisResult`.

mod layer_filter;

use std::collections::HashMap;
use std::time::Instant;

use core_config::MatcherConfig;
use core_model::{
    AnalysisResult, BOQItem, CancellationToken, Deadline, PipelineError, Region, RegionKind,
};
use rayon::prelude::*;

pub use layer_filter::filter_segments;

/// Run the full pipeline against one DXF file and its bill of quantities.
/// Each stage checks `deadline` before it starts; a timeout or cancellation
/// short-circuits the run rather than returning partial, inconsistent
/// results.
pub fn analyze(
    dxf_bytes: &[u8],
    boq_items: &[BOQItem],
    config: &MatcherConfig,
    cancellation: CancellationToken,
) -> Result<AnalysisResult, PipelineError> {
    let started_at = Instant::now();
    let deadline = Deadline::new(config.options.deadline, cancellation);
    let options = &config.options;

    let extraction = core_dxf::extract(dxf_bytes, options.hint_unit, |layer| config.is_whitelisted_layer(layer))?;
    deadline.check()?;

    let (filtered_segments, mut warnings) = layer_filter::filter_segments(extraction.segments, config, options.max_segments);
    warnings.extend(extraction.warnings.iter().cloned());

    let cleaned = core_geometry::clean(filtered_segments, options);
    deadline.check()?;

    let extracted = core_region::extract_regions(&cleaned, &extraction.hatch_regions, options.min_area, options.max_area);
    warnings.extend(extracted.warnings.iter().cloned());

    let mut regions = extracted.regions;
    if options.multi_resolution {
        let multi = core_region::extract_multi_resolution(&cleaned, options.min_area, options.max_area);
        regions = merge_region_passes(regions, multi);
    }
    deadline.check()?;

    let drawing_area = (extraction.bounds.max_x - extraction.bounds.min_x).max(0.0)
        * (extraction.bounds.max_y - extraction.bounds.min_y).max(0.0);

    regions.par_iter_mut().for_each(|region| {
        region.associated_text = core_semantic::associate_texts(region, &extraction.texts, core_semantic::DEFAULT_MAX_DISTANCE);
        let (class, _confidence) = core_semantic::classify(region, core_semantic::DEFAULT_MIN_CONFIDENCE);
        region.semantic_class = class;
    });
    deadline.check()?;

    let (matches, unmatched) =
        core_match::match_boq_items(boq_items, &extraction.texts, &regions, &cleaned, options, drawing_area);

    tracing::info!(
        regions = regions.len(),
        matches = matches.len(),
        unmatched = unmatched.len(),
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(AnalysisResult {
        regions,
        matches,
        unmatched,
        warnings,
        detected_unit: extraction.detected_unit,
        unit_confidence: extraction.unit_confidence,
        unit_factor: extraction.unit_factor,
        layer_metadata: extraction.layer_metadata,
        block_metadata: extraction.block_metadata,
        processing_time_ms: started_at.elapsed().as_millis(),
    })
}

/// Combine the single-pass region set with the multi-resolution tiers,
/// deduplicating by `(layer, round(area, 2))` the same way `core-region`
/// dedups within one pass, then renumber ids so the two independently
/// produced id sequences don't collide.
fn merge_region_passes(base: Vec<Region>, extra: Vec<Region>) -> Vec<Region> {
    let mut seen: HashMap<(String, i64), ()> = HashMap::new();
    let mut merged = Vec::with_capacity(base.len() + extra.len());

    for region in base.into_iter().chain(extra.into_iter()) {
        let key = dedup_key(&region);
        if seen.insert(key, ()).is_none() {
            merged.push(region);
        }
    }

    for (id, region) in merged.iter_mut().enumerate() {
        region.id = (id + 1) as u64;
    }
    merged
}

fn dedup_key(region: &Region) -> (String, i64) {
    let layer = region.source_layers.first().cloned().unwrap_or_default();
    let area_key = if region.kind == RegionKind::Hatch {
        // Hatch regions never collide with extracted/virtual ones on area
        // alone; keep their own key space.
        -((region.area * 100.0).round() as i64) - 1
    } else {
        (region.area * 100.0).round() as i64
    };
    (layer, area_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{Point, Resolution, SemanticClass};

    fn region(id: u64, layer: &str, area: f64, kind: RegionKind) -> Region {
        Region {
            id,
            boundary: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 1.0)],
            area,
            perimeter: 4.0,
            centroid: Point::new(0.5, 0.5),
            kind,
            resolution: Resolution::Medium,
            source_layers: vec![layer.to_string()],
            semantic_class: SemanticClass::Unknown,
            associated_text: vec![],
        }
    }

    #[test]
    fn merge_deduplicates_matching_layer_and_area() {
        let base = vec![region(1, "a-arq-piso", 10.0, RegionKind::Extracted)];
        let extra = vec![region(1, "a-arq-piso", 10.0, RegionKind::Extracted), region(2, "a-arq-muro", 5.0, RegionKind::Extracted)];
        let merged = merge_region_passes(base, extra);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_renumbers_ids_sequentially() {
        let base = vec![region(7, "a", 1.0, RegionKind::Extracted)];
        let extra = vec![region(7, "b", 2.0, RegionKind::Extracted)];
        let merged = merge_region_passes(base, extra);
        let ids: Vec<u64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
