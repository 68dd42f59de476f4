//! Parses a wall height label of the form `H = 2.5m` near a region, falling
//! back to the configured default when none is found.

use std::sync::OnceLock;

use core_model::{AssociatedText, Point};
use regex::Regex;

const SEARCH_RADIUS: f64 = 2.0;

fn height_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)h\s*=\s*(\d+[.,]?\d*)").unwrap())
}

pub struct DetectedHeight {
    pub meters: f64,
    pub source_label: Option<String>,
}

/// Search `associated_text` (already filtered to a region's nearby labels)
/// for an `H=` marker within `SEARCH_RADIUS` of `anchor`; fall back to
/// `default_height` when none is found or parsing fails.
pub fn detect_wall_height(associated_text: &[AssociatedText], anchor: Point, default_height: f64) -> DetectedHeight {
    for text in associated_text {
        if text.text.position.distance_to(&anchor) > SEARCH_RADIUS {
            continue;
        }
        if let Some(captures) = height_re().captures(&text.text.content) {
            let raw = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            if let Ok(value) = raw.replace(',', ".").parse::<f64>() {
                return DetectedHeight { meters: value, source_label: Some(text.text.content.clone()) };
            }
        }
    }
    DetectedHeight { meters: default_height, source_label: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{TextBlock, TextRelationship};

    fn nearby_text(content: &str, distance: f64) -> AssociatedText {
        AssociatedText {
            text: TextBlock::new(content, Point::new(distance, 0.0), "0", 0.2),
            relationship: TextRelationship::NearCentroid,
            distance,
        }
    }

    #[test]
    fn parses_height_with_decimal_comma() {
        let texts = vec![nearby_text("Tabique interior H=2,5m", 1.0)];
        let detected = detect_wall_height(&texts, Point::new(0.0, 0.0), 2.4);
        assert!((detected.meters - 2.5).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_default_when_no_label_found() {
        let texts = vec![nearby_text("Tabique interior", 1.0)];
        let detected = detect_wall_height(&texts, Point::new(0.0, 0.0), 2.4);
        assert_eq!(detected.meters, 2.4);
        assert!(detected.source_label.is_none());
    }

    #[test]
    fn ignores_height_labels_outside_the_search_radius() {
        let texts = vec![nearby_text("H=3.0", 5.0)];
        let detected = detect_wall_height(&texts, Point::new(0.0, 0.0), 2.4);
        assert_eq!(detected.meters, 2.4);
    }
}
