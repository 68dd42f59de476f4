//! Sanity checks run against a resolved quantity before confidence scoring.
//! Each rule returns at most one finding; findings are appended to
//! `Match.warnings` and feed the confidence penalty in `confidence.rs`.

use core_model::{RegionKind, UnitFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

/// Coarse absolute bounds per unit family. The spec additionally names a
/// "global" bound of [0.1, 100] alongside area/linear/count; under this
/// model every `BOQItem` resolves to one of the three families via
/// `UnitFamily::from_unit_str`, so the global bound has no reachable case
/// and is intentionally not encoded here (see DESIGN.md).
fn absolute_range(unit_family: UnitFamily) -> (f64, f64) {
    match unit_family {
        UnitFamily::Area => (0.1, 2000.0),
        UnitFamily::Linear => (0.1, 1000.0),
        UnitFamily::Count => (1.0, 1000.0),
    }
}

/// Narrower bounds used for a (warning-only) plausibility check, tighter
/// than `absolute_range` by roughly an order of magnitude on the area/linear
/// families (see DESIGN.md for the Open Question resolution).
fn typical_range(unit_family: UnitFamily) -> (f64, f64) {
    match unit_family {
        UnitFamily::Area => (0.5, 500.0),
        UnitFamily::Linear => (0.5, 200.0),
        UnitFamily::Count => (1.0, 200.0),
    }
}

pub fn check_absolute_range(unit_family: UnitFamily, qty: f64) -> Option<Finding> {
    let (min, max) = absolute_range(unit_family);
    if qty < min || qty > max {
        Some(Finding { severity: Severity::Error, message: format!("quantity {qty:.3} outside absolute range [{min}, {max}]") })
    } else {
        None
    }
}

pub fn check_typical_range(unit_family: UnitFamily, qty: f64) -> Option<Finding> {
    let (min, max) = typical_range(unit_family);
    if qty < min || qty > max {
        Some(Finding { severity: Severity::Warning, message: format!("quantity {qty:.3} outside typical range [{min}, {max}]") })
    } else {
        None
    }
}

pub fn check_expected_match(qty: f64, expected: Option<f64>) -> Option<Finding> {
    let expected = expected?;
    if expected.abs() < f64::EPSILON {
        return None;
    }
    let deviation = (qty / expected - 1.0).abs();
    if deviation > 0.5 {
        Some(Finding { severity: Severity::Error, message: format!("quantity deviates {:.0}% from expected {expected:.3}", deviation * 100.0) })
    } else if deviation > 0.2 {
        Some(Finding { severity: Severity::Warning, message: format!("quantity deviates {:.0}% from expected {expected:.3}", deviation * 100.0) })
    } else {
        None
    }
}

pub fn check_hatch_false_positive(kind: RegionKind, qty: f64, drawing_area: f64) -> Option<Finding> {
    if kind == RegionKind::Hatch && drawing_area > 0.0 && qty > 0.8 * drawing_area {
        Some(Finding {
            severity: Severity::Error,
            message: format!("hatch-derived quantity {qty:.3} exceeds 80% of the drawing area {drawing_area:.3}"),
        })
    } else {
        None
    }
}

/// `parent_area` is the drawing's overall bounding-box area: the data model
/// has no explicit region-hierarchy, so the drawing extent stands in for
/// "the parent" (see DESIGN.md Open Question resolution).
pub fn check_region_vs_parent(qty: f64, parent_area: f64) -> Option<Finding> {
    if parent_area > 0.0 && qty > 1.1 * parent_area {
        Some(Finding {
            severity: Severity::Error,
            message: format!("quantity {qty:.3} exceeds 110% of the drawing's bounding area {parent_area:.3}"),
        })
    } else {
        None
    }
}

pub fn run_all(
    unit_family: UnitFamily,
    qty: f64,
    expected: Option<f64>,
    kind: RegionKind,
    drawing_area: f64,
) -> Vec<Finding> {
    [
        check_absolute_range(unit_family, qty),
        check_typical_range(unit_family, qty),
        check_expected_match(qty, expected),
        check_hatch_false_positive(kind, qty, drawing_area),
        check_region_vs_parent(qty, drawing_area),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_range_flags_implausibly_large_area() {
        let finding = check_absolute_range(UnitFamily::Area, 5000.0).unwrap();
        assert_eq!(finding.severity, Severity::Error);
    }

    #[test]
    fn expected_match_within_tolerance_is_silent() {
        assert!(check_expected_match(100.0, Some(105.0)).is_none());
    }

    #[test]
    fn expected_match_large_deviation_is_an_error() {
        let finding = check_expected_match(100.0, Some(50.0)).unwrap();
        assert_eq!(finding.severity, Severity::Error);
    }

    #[test]
    fn hatch_exceeding_drawing_area_is_flagged() {
        let finding = check_hatch_false_positive(RegionKind::Hatch, 900.0, 1000.0).unwrap();
        assert_eq!(finding.severity, Severity::Error);
    }
}
