//! Per-layer gap-closing tolerance table (spec.md §4.3).
//!
//! Grounded in `region_extractor.py`'s `force_close_polygons`, which widens
//! the generic gap-close tolerance for layers known to be drawn with larger
//! intentional gaps (door swings, furniture blocks) and narrows it for
//! layers where a wide tolerance would bridge unrelated rooms.

/// `(layer name substring, tolerance in meters)` pairs, checked in order;
/// the first substring match wins. Layers matching nothing use the
/// caller-supplied default (`Options::max_gap`).
pub fn force_close_table() -> Vec<(&'static str, f64)> {
    vec![
        ("fa_0.20", 0.20),
        ("cielo falso", 0.20),
        ("tabiques", 0.10),
        ("mb-elev 2", 0.20),
    ]
}

pub fn tolerance_for_layer(layer: &str, default: f64) -> f64 {
    let lower = layer.to_lowercase();
    for (needle, tolerance) in force_close_table() {
        if lower.contains(needle) {
            return tolerance;
        }
    }
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabiques_layer_gets_narrowed_tolerance() {
        assert_eq!(tolerance_for_layer("a-arq-tabiques", 0.05), 0.10);
    }

    #[test]
    fn fa_0_20_layer_gets_widened_tolerance() {
        assert_eq!(tolerance_for_layer("FA_0.20", 0.05), 0.20);
    }

    #[test]
    fn unmatched_layer_falls_back_to_default() {
        assert_eq!(tolerance_for_layer("A-COTAS", 0.05), 0.05);
    }
}
