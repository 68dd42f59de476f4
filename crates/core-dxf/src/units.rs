//! Unit inference: choose a meters-conversion factor from the DXF header's
//! declared units, a user hint, or drawing-extents heuristics (spec.md
//! §4.1, "Unit inference").

use core_model::{UnitConfidence, UnitHint};

/// The subset of DXF `$INSUNITS` codes spec.md treats as authoritative.
/// 1 = inches, 2 = feet, 4 = millimeters, 5 = centimeters, 6 = meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderUnitCode {
    Inches,
    Feet,
    Millimeters,
    Centimeters,
    Meters,
    Unitless,
    Other,
}

impl HeaderUnitCode {
    pub fn from_insunits(code: i16) -> HeaderUnitCode {
        match code {
            0 => HeaderUnitCode::Unitless,
            1 => HeaderUnitCode::Inches,
            2 => HeaderUnitCode::Feet,
            4 => HeaderUnitCode::Millimeters,
            5 => HeaderUnitCode::Centimeters,
            6 => HeaderUnitCode::Meters,
            _ => HeaderUnitCode::Other,
        }
    }

    fn meters_factor_and_label(&self) -> Option<(f64, &'static str)> {
        match self {
            HeaderUnitCode::Inches => Some((0.0254, "Inches")),
            HeaderUnitCode::Feet => Some((0.3048, "Feet")),
            HeaderUnitCode::Millimeters => Some((0.001, "Millimeters")),
            HeaderUnitCode::Centimeters => Some((0.01, "Centimeters")),
            HeaderUnitCode::Meters => Some((1.0, "Meters")),
            HeaderUnitCode::Unitless | HeaderUnitCode::Other => None,
        }
    }
}

/// Result of the unit-inference heuristic: the factor to multiply raw
/// drawing coordinates by to get meters, a human-readable label, and the
/// confidence tier to surface on `AnalysisResult`.
pub struct UnitDecision {
    pub factor: f64,
    pub label: String,
    pub confidence: UnitConfidence,
}

/// `(width, height)` of the drawing extents in raw (unconverted) units, used
/// by the extents heuristic when the header declares no unit and no hint is
/// given.
pub fn infer_unit(
    header_code: HeaderUnitCode,
    hint: Option<UnitHint>,
    raw_extents_size: Option<(f64, f64)>,
) -> UnitDecision {
    if let Some((factor, label)) = header_code.meters_factor_and_label() {
        return UnitDecision {
            factor,
            label: label.to_string(),
            confidence: UnitConfidence::High,
        };
    }

    if let Some(hint) = hint {
        return UnitDecision {
            factor: hint.meters_factor(),
            label: format!("{hint:?} (Hint)"),
            confidence: UnitConfidence::Medium,
        };
    }

    match raw_extents_size {
        Some((w, h)) if w.max(h) > 5000.0 => UnitDecision {
            factor: 0.001,
            label: "Millimeters (Inferred)".to_string(),
            confidence: UnitConfidence::Medium,
        },
        Some((w, h)) if w.max(h) < 2000.0 => UnitDecision {
            factor: 1.0,
            label: "Meters (Inferred)".to_string(),
            confidence: UnitConfidence::Low,
        },
        _ => UnitDecision {
            factor: 1.0,
            label: "Meters (Default)".to_string(),
            confidence: UnitConfidence::Low,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_header_code_wins_with_high_confidence() {
        let decision = infer_unit(HeaderUnitCode::Millimeters, Some(UnitHint::Meters), None);
        assert_eq!(decision.factor, 0.001);
        assert_eq!(decision.confidence, UnitConfidence::High);
    }

    #[test]
    fn hint_used_when_header_is_unitless() {
        let decision = infer_unit(HeaderUnitCode::Unitless, Some(UnitHint::Millimeters), None);
        assert_eq!(decision.factor, 0.001);
        assert_eq!(decision.confidence, UnitConfidence::Medium);
    }

    #[test]
    fn large_extents_infer_millimeters() {
        let decision = infer_unit(HeaderUnitCode::Unitless, None, Some((25_000.0, 18_000.0)));
        assert_eq!(decision.factor, 1e-3);
        assert!(decision.label.contains("Millimeters"));
        assert_eq!(decision.confidence, UnitConfidence::Medium);
    }

    #[test]
    fn small_extents_infer_meters_with_low_confidence() {
        let decision = infer_unit(HeaderUnitCode::Unitless, None, Some((50.0, 30.0)));
        assert_eq!(decision.factor, 1.0);
        assert_eq!(decision.confidence, UnitConfidence::Low);
    }

    #[test]
    fn missing_geometry_defaults_to_meters() {
        let decision = infer_unit(HeaderUnitCode::Unitless, None, None);
        assert_eq!(decision.factor, 1.0);
        assert_eq!(decision.label, "Meters (Default)");
    }
}
