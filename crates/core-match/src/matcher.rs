//! Orchestrates BOQ-item-to-region matching: text candidate resolution,
//! spatial strategy resolution, quantity computation, sanity checks and
//! confidence scoring, for every line item in one run.

use std::collections::HashMap;

use core_model::{BOQItem, Match, Options, Region, Segment, SpatialStrategy, TextBlock, UnmatchedItem};
use core_spatial::RegionIndex;
use core_semantic::match_labels;

use crate::confidence::{self, ConfidenceInput};
use crate::fallback_estimator::SegmentProximityIndex;
use crate::quantity::{compute_quantity, convex_hull_area, QuantityResult};
use crate::sanity;
use crate::strategy::{resolve_region, StrategyResolution};

const MIN_DESCRIPTION_LEN: usize = 3;
const COMBINED_SCORE_THRESHOLD: f64 = 0.6;
const EXPECTED_QTY_BONUS: f64 = 0.2;
const VIRTUAL_ID_BASE: u64 = 1_000_000_000;

struct Hit {
    region: Region,
    is_virtual: bool,
    strategy: SpatialStrategy,
    spatial_score: f64,
    text_score: f64,
    combined: f64,
    quantity: QuantityResult,
}

/// Resolves every item in `items` against the drawing's regions and texts,
/// returning accepted matches and items nothing could be resolved for.
pub fn match_boq_items(
    items: &[BOQItem],
    texts: &[TextBlock],
    regions: &[Region],
    segments: &[Segment],
    options: &Options,
    drawing_area: f64,
) -> (Vec<Match>, Vec<UnmatchedItem>) {
    let region_index = RegionIndex::build(regions);
    let segment_index = SegmentProximityIndex::build(segments);
    let labels: Vec<String> = texts.iter().map(|t| t.content.clone()).collect();

    let mut matches = Vec::new();
    let mut unmatched = Vec::new();
    let mut next_virtual_id = VIRTUAL_ID_BASE;

    for item in items {
        if item.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            unmatched.push(UnmatchedItem { boq_item_id: item.id, reason: "description too short to match".to_string() });
            continue;
        }

        let candidates = match_labels(&item.description, &labels, options.text_match_threshold);
        if candidates.is_empty() {
            unmatched.push(UnmatchedItem { boq_item_id: item.id, reason: "no matching label text found".to_string() });
            continue;
        }

        let mut hits: Vec<Hit> = Vec::new();
        for candidate in &candidates {
            for text in texts.iter().filter(|t| t.content == candidate.label) {
                let Some((strategy, spatial_score, resolution)) =
                    resolve_region(text.position, &region_index, &segment_index, options.spatial_search_radius, next_virtual_id)
                else {
                    continue;
                };
                if let StrategyResolution::Virtual(_) = resolution {
                    next_virtual_id += 1;
                }

                let region = match resolution {
                    StrategyResolution::Existing(region) => region.clone(),
                    StrategyResolution::Virtual(region) => region,
                };

                let quantity = compute_quantity(item, &region, options.default_wall_height);

                let mut combined = 0.6 * candidate.score + 0.4 * spatial_score;
                if let Some(expected) = item.expected_qty {
                    if expected > 0.0 {
                        let ratio = quantity.qty / expected;
                        if (0.8..=1.2).contains(&ratio) {
                            combined += EXPECTED_QTY_BONUS;
                        }
                    }
                }
                combined = combined.min(1.0);
                if combined < COMBINED_SCORE_THRESHOLD {
                    continue;
                }

                let is_virtual = matches!(strategy, SpatialStrategy::FallbackEstimator);
                hits.push(Hit { region, is_virtual, strategy, spatial_score, text_score: candidate.score, combined, quantity });
            }
        }

        if hits.is_empty() {
            unmatched.push(UnmatchedItem { boq_item_id: item.id, reason: "no spatial match found".to_string() });
            continue;
        }

        matches.push(build_match(item, hits, options, drawing_area));
    }

    tracing::info!(
        matched = matches.len(),
        unmatched = unmatched.len(),
        "boq matching complete"
    );

    (matches, unmatched)
}

/// Deduplicates hits by region identity (real regions by id, virtual hits
/// never dedup against each other), sums their quantities, and builds the
/// final `Match` from the single best-scoring hit's strategy/region shape.
fn build_match(item: &BOQItem, hits: Vec<Hit>, options: &Options, drawing_area: f64) -> Match {
    let mut by_region: HashMap<(bool, u64), Hit> = HashMap::new();
    for hit in hits {
        let key = (hit.is_virtual, hit.region.id);
        by_region
            .entry(key)
            .and_modify(|existing| {
                if hit.combined > existing.combined {
                    *existing = clone_hit(&hit);
                }
            })
            .or_insert(hit);
    }

    let mut deduped: Vec<Hit> = by_region.into_values().collect();
    deduped.sort_by(|a, b| b.combined.partial_cmp(&a.combined).unwrap());

    let best_idx = 0;
    let mut total_qty = 0.0;
    let mut reason_parts = Vec::new();
    for hit in &deduped {
        total_qty += hit.quantity.qty;
        reason_parts.push(hit.quantity.reason_suffix.clone());
    }

    let best = &deduped[best_idx];
    let region_ids: Vec<u64> = deduped.iter().map(|h| h.region.id).collect();

    let findings = sanity::run_all(item.unit_family, total_qty, item.expected_qty, best.region.kind, drawing_area);

    let hull_area = convex_hull_area(&best.region.boundary);
    let confidence_input = ConfidenceInput {
        text_score: best.text_score,
        spatial_score: best.spatial_score,
        region: &best.region,
        hull_area,
        min_area: options.min_area,
        max_area: options.max_area,
        strategy: best.strategy,
        qty: total_qty,
        expected_qty: item.expected_qty,
    };
    let confidence = confidence::score(&confidence_input, &findings);

    let mut warnings: Vec<String> = findings.iter().map(|f| f.message.clone()).collect();
    if region_ids.len() > 1 {
        warnings.push(format!("quantity aggregated across {} regions", region_ids.len()));
    }

    Match {
        boq_item_id: item.id,
        region_ids,
        strategy: best.strategy,
        qty_calculated: total_qty,
        text_match_score: best.text_score,
        spatial_score: best.spatial_score,
        confidence,
        match_reason: format!("{} via {}", reason_parts.join("; "), best.strategy.as_str()),
        warnings,
    }
}

fn clone_hit(hit: &Hit) -> Hit {
    Hit {
        region: hit.region.clone(),
        is_virtual: hit.is_virtual,
        strategy: hit.strategy,
        spatial_score: hit.spatial_score,
        text_score: hit.text_score,
        combined: hit.combined,
        quantity: hit.quantity.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{EntityType, RegionKind, Resolution, Segment, SemanticClass, UnitFamily};

    fn boq(id: u64, description: &str, unit_family: UnitFamily) -> BOQItem {
        BOQItem { id, description: description.to_string(), unit: "m2".into(), unit_family, expected_qty: None }
    }

    fn square_region(id: u64, min: (f64, f64), side: f64, layer: &str) -> Region {
        let (x, y) = min;
        Region {
            id,
            boundary: vec![
                Point::new(x, y),
                Point::new(x + side, y),
                Point::new(x + side, y + side),
                Point::new(x, y + side),
            ],
            area: side * side,
            perimeter: side * 4.0,
            centroid: Point::new(x + side / 2.0, y + side / 2.0),
            kind: RegionKind::Extracted,
            resolution: Resolution::Medium,
            source_layers: vec![layer.into()],
            semantic_class: SemanticClass::Unknown,
            associated_text: vec![],
        }
    }

    use core_model::Point;

    #[test]
    fn label_inside_a_region_produces_an_accepted_match() {
        let regions = vec![square_region(1, (0.0, 0.0), 10.0, "a-arq-piso")];
        let texts = vec![TextBlock::new("Sala de Ventas", Point::new(5.0, 5.0), "0", 0.2)];
        let items = vec![boq(1, "Sala de Ventas", UnitFamily::Area)];
        let segments: Vec<Segment> = vec![];
        let options = Options::default();

        let (matches, unmatched) = match_boq_items(&items, &texts, &regions, &segments, &options, 100.0);
        assert!(unmatched.is_empty());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].region_ids, vec![1]);
        assert!((matches[0].qty_calculated - 100.0).abs() < 1e-9);
    }

    #[test]
    fn item_with_short_description_is_unmatched() {
        let regions: Vec<Region> = vec![];
        let texts: Vec<TextBlock> = vec![];
        let items = vec![boq(1, "ab", UnitFamily::Count)];
        let segments: Vec<Segment> = vec![];
        let options = Options::default();

        let (matches, unmatched) = match_boq_items(&items, &texts, &regions, &segments, &options, 0.0);
        assert!(matches.is_empty());
        assert_eq!(unmatched[0].reason, "description too short to match");
    }

    #[test]
    fn item_with_no_matching_text_is_unmatched() {
        let regions = vec![square_region(1, (0.0, 0.0), 10.0, "a-arq-piso")];
        let texts = vec![TextBlock::new("Escalera principal", Point::new(5.0, 5.0), "0", 0.2)];
        let items = vec![boq(1, "Pavimento sala de ventas", UnitFamily::Area)];
        let segments: Vec<Segment> = vec![];
        let options = Options::default();

        let (matches, unmatched) = match_boq_items(&items, &texts, &regions, &segments, &options, 100.0);
        assert!(matches.is_empty());
        assert_eq!(unmatched[0].reason, "no matching label text found");
        let _ = EntityType::Line;
    }
}
