//! Rule-based region classification into {Floor, Wall, Ceiling, Fixture,
//! Annotation, Unknown}, combining geometry, layer name and associated-text
//! signals.

use core_config::{all_categories, CategorySpec};
use core_model::{Region, SemanticClass};

/// Default arg-max floor below which a region is classified `Unknown`.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

const LAYER_PREFIX_BONUS: f64 = 0.35;
const LAYER_SUBSTRING_BONUS: f64 = 0.25;
const TEXT_WORD_BOUNDARY_BONUS: f64 = 0.25;
const TEXT_SUBSTRING_BONUS: f64 = 0.15;
const MAX_TEXT_HITS: usize = 2;
const MAX_TEXT_BONUS: f64 = 0.4;

/// Geometry-derived score for one category, folding in area scale, aspect
/// ratio and a Z-level proxy (0 when unavailable, per spec's default).
fn geometry_score(class: SemanticClass, region: &Region) -> f64 {
    let aspect = aspect_ratio(region);
    let area = region.area;

    match class {
        SemanticClass::Floor | SemanticClass::Ceiling => {
            // Floors/ceilings read as large, roughly square-ish areas.
            let area_signal = if area > 5.0 { 0.3 } else { 0.0 };
            let shape_signal = if (0.3..=3.0).contains(&aspect) { 0.2 } else { 0.0 };
            area_signal + shape_signal
        }
        SemanticClass::Wall => {
            // Walls read as thin, elongated strips.
            if !(0.3..=3.0).contains(&aspect) {
                0.4
            } else {
                0.1
            }
        }
        SemanticClass::Fixture => {
            if area < 5.0 {
                0.3
            } else {
                0.0
            }
        }
        SemanticClass::Annotation => 0.0,
        SemanticClass::Unknown => 0.0,
    }
}

fn aspect_ratio(region: &Region) -> f64 {
    let (min_x, min_y, max_x, max_y) = bounds(region);
    let width = (max_x - min_x).max(1e-9);
    let height = (max_y - min_y).max(1e-9);
    if width >= height {
        width / height
    } else {
        height / width
    }
}

fn bounds(region: &Region) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &region.boundary {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (min_x, min_y, max_x, max_y)
}

fn layer_score(spec: &CategorySpec, layer: &str) -> f64 {
    let lower = layer.to_lowercase();
    if spec.layer_prefixes.iter().any(|p| lower.starts_with(&p.to_lowercase())) {
        return LAYER_PREFIX_BONUS;
    }
    if spec.layer_contains.iter().any(|c| lower.contains(c)) {
        return LAYER_SUBSTRING_BONUS;
    }
    0.0
}

fn text_score(spec: &CategorySpec, region: &Region) -> f64 {
    let mut hits = 0usize;
    let mut total = 0.0;
    for text in region.label_candidates() {
        if hits >= MAX_TEXT_HITS {
            break;
        }
        let normalized = text.to_lowercase();
        let mut matched = false;
        for keyword in &spec.keywords {
            if word_boundary_match(&normalized, keyword) {
                total += TEXT_WORD_BOUNDARY_BONUS;
                matched = true;
                break;
            } else if normalized.contains(keyword) {
                total += TEXT_SUBSTRING_BONUS;
                matched = true;
                break;
            }
        }
        if matched {
            hits += 1;
        }
    }
    total.min(MAX_TEXT_BONUS)
}

fn word_boundary_match(haystack: &str, needle: &str) -> bool {
    haystack.split(|c: char| !c.is_alphanumeric()).any(|word| word == needle)
}

/// Classify a region, returning its best category and the confidence score
/// that produced it. Falls back to `Unknown` when the best score is below
/// `min_confidence`.
pub fn classify(region: &Region, min_confidence: f64) -> (SemanticClass, f64) {
    let layer = region.source_layers.first().map(String::as_str).unwrap_or("");
    let mut best = (SemanticClass::Unknown, 0.0_f64);

    for spec in all_categories() {
        let score = geometry_score(spec.class, region) + layer_score(&spec, layer) + text_score(&spec, region);
        if score > best.1 {
            best = (spec.class, score);
        }
    }

    if best.1 >= min_confidence {
        best
    } else {
        (SemanticClass::Unknown, best.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{AssociatedText, Point, RegionKind, Resolution, TextBlock, TextRelationship};

    fn square_region(side: f64, layer: &str) -> Region {
        Region {
            id: 1,
            boundary: vec![
                Point::new(0.0, 0.0),
                Point::new(side, 0.0),
                Point::new(side, side),
                Point::new(0.0, side),
            ],
            area: side * side,
            perimeter: side * 4.0,
            centroid: Point::new(side / 2.0, side / 2.0),
            kind: RegionKind::Extracted,
            resolution: Resolution::Medium,
            source_layers: vec![layer.to_string()],
            semantic_class: SemanticClass::Unknown,
            associated_text: Vec::new(),
        }
    }

    #[test]
    fn layer_prefix_drives_floor_classification() {
        let region = square_region(10.0, "LOSA-PRINCIPAL");
        let (class, confidence) = classify(&region, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(class, SemanticClass::Floor);
        assert!(confidence >= DEFAULT_MIN_CONFIDENCE);
    }

    #[test]
    fn unlabeled_small_region_with_no_signal_is_unknown() {
        let mut region = square_region(0.6, "0");
        region.source_layers = vec!["0".to_string()];
        let (class, _) = classify(&region, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(class, SemanticClass::Unknown);
    }

    #[test]
    fn associated_text_can_tip_classification_to_ceiling() {
        let mut region = square_region(8.0, "0");
        region.associated_text.push(AssociatedText {
            text: TextBlock::new("Cielo falso volcanita", Point::new(1.0, 1.0), "0", 0.2),
            relationship: TextRelationship::Inside,
            distance: 0.0,
        });
        let (class, _) = classify(&region, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(class, SemanticClass::Ceiling);
    }
}
