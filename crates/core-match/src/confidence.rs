//! Combines a match's component scores into a single confidence value the
//! review UI can sort and threshold on.

use core_model::{Region, SpatialStrategy};

use crate::sanity::{Finding, Severity};

const TEXT_WEIGHT: f64 = 0.20;
const SPATIAL_WEIGHT: f64 = 0.25;
const GEOMETRY_WEIGHT: f64 = 0.20;
const EXPECTED_WEIGHT: f64 = 0.25;
const SOURCE_WEIGHT: f64 = 0.10;

const WARNING_PENALTY: f64 = 0.9;
const ERROR_PENALTY: f64 = 0.5;

/// Geometry-quality factor: a base credit plus bonuses for convexity and for
/// the region's area sitting inside the accepted `[min_area, max_area]` band.
fn geometry_quality(region: &Region, hull_area: f64, min_area: f64, max_area: f64) -> f64 {
    let convexity_bonus = region.convexity(hull_area) * 0.3;
    let in_range_bonus = if region.area >= min_area && region.area <= max_area { 0.2 } else { 0.0 };
    (0.5 + convexity_bonus + in_range_bonus).min(1.0)
}

/// Source-reliability factor: extracted line-work and hatch boundaries are
/// both taken as reliably sourced; virtual (fallback-estimated) regions are
/// a weaker basis for a quantity and score lower.
fn source_reliability(strategy: SpatialStrategy) -> f64 {
    match strategy {
        SpatialStrategy::FallbackEstimator => 0.5,
        _ => 1.0,
    }
}

/// spec.md §4.11: "1.0 within ±10%, decaying" — the factor plateaus at 1.0
/// for any deviation up to 10%, then decays linearly past that point.
const EXPECTED_MATCH_PLATEAU: f64 = 0.1;

fn expected_match_factor(qty: f64, expected_qty: Option<f64>) -> f64 {
    match expected_qty {
        None => 0.75,
        Some(expected) if expected.abs() < f64::EPSILON => 0.75,
        Some(expected) => {
            let deviation = (qty / expected - 1.0).abs();
            if deviation <= EXPECTED_MATCH_PLATEAU {
                1.0
            } else {
                (1.0 - (deviation - EXPECTED_MATCH_PLATEAU)).clamp(0.0, 1.0)
            }
        }
    }
}

#[derive(Clone, Copy)]
pub struct ConfidenceInput<'a> {
    pub text_score: f64,
    pub spatial_score: f64,
    pub region: &'a Region,
    pub hull_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub strategy: SpatialStrategy,
    pub qty: f64,
    pub expected_qty: Option<f64>,
}

/// Weighted blend of the five confidence factors, then penalized by any
/// sanity findings (errors halve, warnings each cost 10%).
pub fn score(input: &ConfidenceInput<'_>, findings: &[Finding]) -> f64 {
    let base = TEXT_WEIGHT * input.text_score.clamp(0.0, 1.0)
        + SPATIAL_WEIGHT * input.spatial_score.clamp(0.0, 1.0)
        + GEOMETRY_WEIGHT * geometry_quality(input.region, input.hull_area, input.min_area, input.max_area)
        + EXPECTED_WEIGHT * expected_match_factor(input.qty, input.expected_qty)
        + SOURCE_WEIGHT * source_reliability(input.strategy);

    let mut penalized = base;
    for finding in findings {
        penalized *= match finding.severity {
            Severity::Error => ERROR_PENALTY,
            Severity::Warning => WARNING_PENALTY,
            Severity::Info => 1.0,
        };
    }
    penalized.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{Point, RegionKind, Resolution, SemanticClass};

    fn region(area: f64) -> Region {
        Region {
            id: 1,
            boundary: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, area), Point::new(0.0, area)],
            area,
            perimeter: 4.0,
            centroid: Point::new(0.5, area / 2.0),
            kind: RegionKind::Extracted,
            resolution: Resolution::Medium,
            source_layers: vec!["a".into()],
            semantic_class: SemanticClass::Unknown,
            associated_text: vec![],
        }
    }

    #[test]
    fn perfect_match_with_no_findings_scores_highly() {
        let r = region(10.0);
        let input = ConfidenceInput {
            text_score: 1.0,
            spatial_score: 1.0,
            region: &r,
            hull_area: 10.0,
            min_area: 0.5,
            max_area: 1000.0,
            strategy: SpatialStrategy::InsideZone,
            qty: 10.0,
            expected_qty: Some(10.0),
        };
        assert!(score(&input, &[]) > 0.9);
    }

    #[test]
    fn sanity_error_halves_the_score() {
        let r = region(10.0);
        let input = ConfidenceInput {
            text_score: 1.0,
            spatial_score: 1.0,
            region: &r,
            hull_area: 10.0,
            min_area: 0.5,
            max_area: 1000.0,
            strategy: SpatialStrategy::InsideZone,
            qty: 10.0,
            expected_qty: Some(10.0),
        };
        let clean = score(&input, &[]);
        let penalized = score(&input, &[Finding { severity: Severity::Error, message: "x".into() }]);
        assert!((penalized - clean * ERROR_PENALTY).abs() < 1e-9);
    }

    #[test]
    fn expected_match_factor_plateaus_within_ten_percent_deviation() {
        assert_eq!(expected_match_factor(10.0, Some(10.0)), 1.0);
        assert_eq!(expected_match_factor(10.9, Some(10.0)), 1.0);
        assert_eq!(expected_match_factor(9.1, Some(10.0)), 1.0);
    }

    #[test]
    fn expected_match_factor_decays_past_the_plateau() {
        let at_plateau_edge = expected_match_factor(11.0, Some(10.0));
        let beyond_plateau = expected_match_factor(12.0, Some(10.0));
        assert!((at_plateau_edge - 1.0).abs() < 1e-9);
        assert!(beyond_plateau < 1.0);
        assert!((beyond_plateau - 0.9).abs() < 1e-9);
    }

    #[test]
    fn fallback_estimator_strategy_scores_lower_than_inside_zone() {
        let r = region(10.0);
        let inside = ConfidenceInput {
            text_score: 0.8,
            spatial_score: 1.0,
            region: &r,
            hull_area: 10.0,
            min_area: 0.5,
            max_area: 1000.0,
            strategy: SpatialStrategy::InsideZone,
            qty: 10.0,
            expected_qty: None,
        };
        let fallback = ConfidenceInput { strategy: SpatialStrategy::FallbackEstimator, ..inside };
        assert!(score(&fallback, &[]) < score(&inside, &[]));
    }
}
