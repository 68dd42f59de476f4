//! Resolves a label position to a region by trying, in order, the four
//! spatial strategies: containment, near-proximity, segment-based fallback
//! estimation, then nearest-neighbor-within-radius.

use core_model::{Point, Region, SpatialStrategy};
use core_spatial::RegionIndex;

use crate::fallback_estimator::SegmentProximityIndex;

const PROXIMITY_RADIUS: f64 = 0.5;
const FALLBACK_RADIUS: f64 = 5.0;

pub enum StrategyResolution<'a> {
    Existing(&'a Region),
    Virtual(Region),
}

pub fn resolve_region<'a>(
    label_position: Point,
    index: &RegionIndex<'a>,
    segment_index: &SegmentProximityIndex<'_>,
    spatial_search_radius: f64,
    next_virtual_id: u64,
) -> Option<(SpatialStrategy, f64, StrategyResolution<'a>)> {
    if let Some(region) = index.contains(label_position) {
        return Some((
            SpatialStrategy::InsideZone,
            SpatialStrategy::InsideZone.base_spatial_score(),
            StrategyResolution::Existing(region),
        ));
    }

    if let Some(region) = index.nearest(label_position, PROXIMITY_RADIUS) {
        return Some((
            SpatialStrategy::Proximity,
            SpatialStrategy::Proximity.base_spatial_score(),
            StrategyResolution::Existing(region),
        ));
    }

    if let Some(virtual_region) = segment_index.estimate(label_position, FALLBACK_RADIUS, next_virtual_id) {
        return Some((
            SpatialStrategy::FallbackEstimator,
            SpatialStrategy::FallbackEstimator.base_spatial_score(),
            StrategyResolution::Virtual(virtual_region),
        ));
    }

    if let Some(region) = index.nearest(label_position, spatial_search_radius) {
        let distance = label_position.distance_to(&region.centroid).min(spatial_search_radius);
        let score = 1.0 - 0.5 * (distance / spatial_search_radius);
        return Some((SpatialStrategy::NearestNeighbor, score.clamp(0.5, 1.0), StrategyResolution::Existing(region)));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{EntityType, RegionKind, Resolution, SemanticClass, Segment};

    fn square_region(id: u64, min: (f64, f64), side: f64) -> Region {
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
            resolution: Resolution::Coarse,
            source_layers: vec!["a".into()],
            semantic_class: SemanticClass::Unknown,
            associated_text: vec![],
        }
    }

    #[test]
    fn label_inside_a_region_resolves_via_inside_zone() {
        let regions = vec![square_region(1, (0.0, 0.0), 10.0)];
        let index = RegionIndex::build(&regions);
        let segments: Vec<Segment> = vec![];
        let segment_index = SegmentProximityIndex::build(&segments);
        let (strategy, _, resolution) = resolve_region(Point::new(5.0, 5.0), &index, &segment_index, 2.0, 1).unwrap();
        assert_eq!(strategy, SpatialStrategy::InsideZone);
        match resolution {
            StrategyResolution::Existing(region) => assert_eq!(region.id, 1),
            StrategyResolution::Virtual(_) => panic!("expected an existing region"),
        }
    }

    #[test]
    fn label_far_from_everything_resolves_to_fallback_estimator() {
        let regions: Vec<Region> = vec![];
        let index = RegionIndex::build(&regions);
        let segments = vec![
            Segment::new((100.0, 0.0).into(), (110.0, 0.0).into(), "a", EntityType::Line),
            Segment::new((110.0, 0.0).into(), (110.0, 6.0).into(), "a", EntityType::Line),
            Segment::new((110.0, 6.0).into(), (100.0, 6.0).into(), "a", EntityType::Line),
        ];
        let segment_index = SegmentProximityIndex::build(&segments);
        let (strategy, _, resolution) = resolve_region(Point::new(105.0, 3.0), &index, &segment_index, 2.0, 42).unwrap();
        assert_eq!(strategy, SpatialStrategy::FallbackEstimator);
        match resolution {
            StrategyResolution::Virtual(region) => assert_eq!(region.id, 42),
            StrategyResolution::Existing(_) => panic!("expected a virtual region"),
        }
    }

    #[test]
    fn nothing_nearby_resolves_to_none() {
        let regions: Vec<Region> = vec![];
        let index = RegionIndex::build(&regions);
        let segments: Vec<Segment> = vec![];
        let segment_index = SegmentProximityIndex::build(&segments);
        assert!(resolve_region(Point::new(0.0, 0.0), &index, &segment_index, 2.0, 1).is_none());
    }
}
