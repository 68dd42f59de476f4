//! Multi-resolution extractor: re-polygonizes each layer's segments at
//! three snapping tolerances, keeping faces whose area falls in the bucket
//! that resolution is meant to cover. Runs independently per layer so it
//! can be parallelized across layers.

use std::collections::HashMap;

use core_geometry::snap_vertices;
use core_model::{Region, RegionKind, Resolution, Segment};
use rayon::prelude::*;

use crate::faces::{is_interior_face, trace_faces};
use crate::graph::PlanarGraph;
use crate::repair::{centroid, perimeter, repair_ring, shoelace_unsigned};

const COARSE_TOLERANCE: f64 = 0.1;
const MEDIUM_TOLERANCE: f64 = 0.01;
const FINE_TOLERANCE: f64 = 0.001;

const COARSE_MIN_AREA: f64 = 10.0;
const MEDIUM_MIN_AREA: f64 = 1.0;

struct Pass {
    resolution: Resolution,
    tolerance: f64,
    accept: fn(f64) -> bool,
}

fn passes() -> [Pass; 3] {
    [
        Pass { resolution: Resolution::Coarse, tolerance: COARSE_TOLERANCE, accept: |a| a >= COARSE_MIN_AREA },
        Pass {
            resolution: Resolution::Medium,
            tolerance: MEDIUM_TOLERANCE,
            accept: |a| a >= MEDIUM_MIN_AREA && a < COARSE_MIN_AREA,
        },
        Pass { resolution: Resolution::Fine, tolerance: FINE_TOLERANCE, accept: |a| a < MEDIUM_MIN_AREA },
    ]
}

/// Produce candidate regions at all three resolutions, grouped by layer.
/// Ordering of the returned list is (layer ascending, resolution
/// coarse -> medium -> fine), matching the merge priority used when
/// deduplicating against the primary region-extraction pass.
pub fn extract_multi_resolution(segments: &[Segment], min_area: f64, max_area: f64) -> Vec<Region> {
    let mut by_layer: HashMap<String, Vec<Segment>> = HashMap::new();
    for s in segments {
        by_layer.entry(s.layer.clone()).or_default().push(s.clone());
    }

    let mut layers: Vec<String> = by_layer.keys().cloned().collect();
    layers.sort();

    let mut next_id: u64 = 1;
    let mut regions = Vec::new();

    for layer in layers {
        let layer_segments = &by_layer[&layer];
        let pass_list = passes();
        let layer_regions: Vec<Vec<(Resolution, Vec<core_model::Point>)>> = pass_list
            .par_iter()
            .map(|pass| {
                let snapped = snap_vertices(layer_segments.clone(), pass.tolerance);
                let graph = PlanarGraph::build(&snapped);
                let mut out = Vec::new();
                for ring in trace_faces(&graph) {
                    if !is_interior_face(&ring) {
                        continue;
                    }
                    let area = shoelace_unsigned(&ring);
                    if area < min_area || area > max_area || !(pass.accept)(area) {
                        continue;
                    }
                    if let Some(repaired) = repair_ring(&ring) {
                        out.push((pass.resolution, repaired));
                    }
                }
                out
            })
            .collect();

        for resolution_regions in layer_regions {
            for (resolution, ring) in resolution_regions {
                let area = shoelace_unsigned(&ring);
                regions.push(Region {
                    id: next_id,
                    boundary: ring.clone(),
                    area,
                    perimeter: perimeter(&ring),
                    centroid: centroid(&ring),
                    kind: RegionKind::Extracted,
                    resolution,
                    source_layers: vec![layer.clone()],
                    semantic_class: core_model::SemanticClass::Unknown,
                    associated_text: Vec::new(),
                });
                next_id += 1;
            }
        }
    }

    regions
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
    fn large_square_lands_in_coarse_bucket() {
        let segments = square(0.0, 0.0, 20.0, "a");
        let regions = extract_multi_resolution(&segments, 0.5, 1_000_000.0);
        assert!(regions.iter().any(|r| r.resolution == Resolution::Coarse));
    }

    #[test]
    fn small_square_lands_in_fine_bucket() {
        let segments = square(0.0, 0.0, 0.8, "a");
        let regions = extract_multi_resolution(&segments, 0.1, 1_000_000.0);
        assert!(regions.iter().any(|r| r.resolution == Resolution::Fine));
    }
}
