//! Planar-graph region extraction: unions line strings, polygonizes the
//! result into closed faces, repairs and filters them by area, assigns
//! each a layer by majority vote, and merges in HATCH boundaries as
//! first-class regions.

mod cycle_fallback;
mod faces;
mod graph;
mod intersect;
mod layer_vote;
mod multires;
mod repair;

use std::collections::HashMap;

use core_model::{HatchRegion, Point, Region, RegionKind, Resolution, Segment};

pub use multires::extract_multi_resolution;

use faces::{is_interior_face, trace_faces};
use graph::PlanarGraph;
use layer_vote::SegmentIndex;
use repair::{centroid, perimeter, repair_ring, shoelace_unsigned};

/// Distance, in meters, a boundary segment may be from a face's ring and
/// still count toward that face's layer vote.
const LAYER_VOTE_BUFFER: f64 = 0.05;

pub struct RegionExtractionResult {
    pub regions: Vec<Region>,
    pub warnings: Vec<String>,
}

/// Build closed faces from `segments`, admit `hatch_regions` as first-class
/// regions, and deduplicate by `(layer, round(area, 2))`. Falls back to
/// cycle-basis polygonization when the union/polygonize path finds nothing.
pub fn extract_regions(
    segments: &[Segment],
    hatch_regions: &[HatchRegion],
    min_area: f64,
    max_area: f64,
) -> RegionExtractionResult {
    let mut warnings = Vec::new();
    let mut next_id: u64 = 1;
    let mut regions = Vec::new();

    if !segments.is_empty() {
        let unioned = intersect::split_at_intersections(segments.to_vec());
        let graph = PlanarGraph::build(&unioned);
        let mut faces = trace_faces(&graph);
        faces.retain(|ring| is_interior_face(ring));

        if faces.is_empty() {
            tracing::debug!("union/polygonize produced no interior faces, trying cycle-basis fallback");
            faces = cycle_fallback::cycle_basis_faces(&graph);
            if !faces.is_empty() {
                warnings.push("region extraction fell back to cycle-basis polygonization".to_string());
            }
        }

        let segment_index = SegmentIndex::build(segments);

        for ring in faces {
            let Some(repaired) = repair_ring(&ring) else {
                continue;
            };
            let area = shoelace_unsigned(&repaired);
            if area < min_area || area > max_area {
                continue;
            }
            let (winner, contributors) = segment_index.vote_layer(&repaired, LAYER_VOTE_BUFFER);
            regions.push(Region {
                id: next_id,
                boundary: repaired.clone(),
                area,
                perimeter: perimeter(&repaired),
                centroid: centroid(&repaired),
                kind: RegionKind::Extracted,
                resolution: Resolution::Medium,
                source_layers: winner_first(winner, contributors),
                semantic_class: core_model::SemanticClass::Unknown,
                associated_text: Vec::new(),
            });
            next_id += 1;
        }
    }

    for hatch in hatch_regions {
        if hatch.boundary.len() < 3 {
            continue;
        }
        let area = hatch.area;
        if area < min_area || area > max_area {
            continue;
        }
        regions.push(Region {
            id: next_id,
            boundary: hatch.boundary.clone(),
            area,
            perimeter: hatch.perimeter(),
            centroid: hatch.centroid(),
            kind: RegionKind::Hatch,
            resolution: Resolution::Medium,
            source_layers: vec![hatch.layer.clone()],
            semantic_class: core_model::SemanticClass::Unknown,
            associated_text: Vec::new(),
        });
        next_id += 1;
    }

    let regions = dedup_regions(regions);

    RegionExtractionResult { regions, warnings }
}

/// Order a face's `source_layers` so the majority-vote winner is always
/// first: downstream consumers (the dedup key below, `core-semantic`'s
/// classifier, `core-pipeline`'s multi-resolution merge) read
/// `source_layers.first()` as "the" region layer, and that must be the
/// vote winner rather than whatever order the R-tree query happened to
/// visit contributors in.
fn winner_first(winner: String, contributors: Vec<String>) -> Vec<String> {
    if contributors.is_empty() {
        return vec![winner];
    }
    let mut out = Vec::with_capacity(contributors.len().max(1));
    out.push(winner.clone());
    out.extend(contributors.into_iter().filter(|l| *l != winner));
    out
}

/// Deduplicate by `(layer, round(area, 2))`; the first-accepted region for
/// a key wins, matching the multi-resolution merge priority.
fn dedup_regions(regions: Vec<Region>) -> Vec<Region> {
    let mut seen: HashMap<(String, i64), ()> = HashMap::new();
    let mut out = Vec::with_capacity(regions.len());
    for region in regions {
        let key = (region.source_layers.first().cloned().unwrap_or_default(), (region.area * 100.0).round() as i64);
        if seen.insert(key, ()).is_none() {
            out.push(region);
        }
    }
    out
}

/// Hatch-derived region ids are surfaced with this string prefix in
/// downstream reporting (the numeric id itself stays compact internally).
pub fn hatch_region_label(id: u64) -> String {
    format!("hatch_{id}")
}

/// Bounding box of a point set, used by the BOQ fallback estimator to build
/// a virtual region from nearby segments.
pub fn bounding_box(points: &[Point]) -> Option<(Point, Point)> {
    if points.is_empty() {
        return None;
    }
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    Some((Point::new(min_x, min_y), Point::new(max_x, max_y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    fn square(x: f64, y: f64, side: f64, layer: &str) -> Vec<Segment> {
        vec![
            Segment::new((x, y).into(), (x + side, y).into(), layer, EntityType::Line),
            Segment::new((x + side, y).into(), (x + side, y + side).into(), layer, EntityType::Line),
            Segment::new((x + side, y + side).into(), (x, y + side).into(), layer, EntityType::Line),
            Segment::new((x, y + side).into(), (x, y).into(), layer, EntityType::Line),
        ]
    }

    #[test]
    fn single_closed_square_yields_one_region() {
        let segments = square(0.0, 0.0, 10.0, "mb-auxiliar");
        let result = extract_regions(&segments, &[], 0.5, 1_000_000.0);
        assert_eq!(result.regions.len(), 1);
        assert!((result.regions[0].area - 100.0).abs() < 1e-6);
    }

    #[test]
    fn two_disconnected_squares_yield_two_regions() {
        let mut segments = square(0.0, 0.0, 4.0, "a");
        segments.extend(square(100.0, 100.0, 9.0, "a"));
        let result = extract_regions(&segments, &[], 0.5, 1_000_000.0);
        assert_eq!(result.regions.len(), 2);
        let mut areas: Vec<i64> = result.regions.iter().map(|r| r.area.round() as i64).collect();
        areas.sort();
        assert_eq!(areas, vec![16, 81]);
    }

    #[test]
    fn empty_segment_set_returns_no_regions() {
        let result = extract_regions(&[], &[], 0.5, 1_000_000.0);
        assert!(result.regions.is_empty());
    }

    #[test]
    fn winner_first_reorders_majority_winner_to_the_front() {
        let contributors = vec!["stray".to_string(), "wall".to_string(), "other".to_string()];
        let ordered = winner_first("wall".to_string(), contributors);
        assert_eq!(ordered[0], "wall");
        assert_eq!(ordered.len(), 3);
    }

    #[test]
    fn winner_first_with_no_contributors_is_just_the_winner() {
        assert_eq!(winner_first("Unknown".to_string(), Vec::new()), vec!["Unknown".to_string()]);
    }

    #[test]
    fn hatch_regions_are_admitted_as_first_class_regions() {
        let hatch = HatchRegion {
            boundary: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 6.0),
                Point::new(0.0, 6.0),
            ],
            layer: "FA_0.20".into(),
            area: 60.0,
            area_is_shoelace_fallback: false,
        };
        let result = extract_regions(&[], std::slice::from_ref(&hatch), 0.5, 1_000_000.0);
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].kind, RegionKind::Hatch);
    }
}
