//! Computes a BOQ item's quantity from a matched region's attributes given
//! its unit family and description keywords.

use core_model::{BOQItem, Region, UnitFamily};
use geo::{coord, Area, ConvexHull, LineString, Polygon};

use crate::height::{detect_wall_height, DetectedHeight};

const HORIZONTAL_KEYWORDS: [&str; 7] = ["cielo", "pisos", "pavimento", "losa", "radier", "sobrelosa", "vitrina"];

#[derive(Clone)]
pub struct QuantityResult {
    pub qty: f64,
    pub detected_height: Option<f64>,
    pub used_linear_to_area: bool,
    pub reason_suffix: String,
}

/// Minimum area/perimeter below which a region is treated as "linear"
/// (effectively zero-width) rather than a true area for the linear-to-area
/// fallback rule.
const LINEAR_AREA_THRESHOLD: f64 = 0.01;

pub fn compute_quantity(item: &BOQItem, region: &Region, default_wall_height: f64) -> QuantityResult {
    match item.unit_family {
        UnitFamily::Count => QuantityResult {
            qty: 1.0,
            detected_height: None,
            used_linear_to_area: false,
            reason_suffix: "counted one matched region".to_string(),
        },
        UnitFamily::Linear => QuantityResult {
            qty: region.perimeter,
            detected_height: None,
            used_linear_to_area: false,
            reason_suffix: "used region perimeter".to_string(),
        },
        UnitFamily::Area => compute_area_quantity(item, region, default_wall_height),
    }
}

fn compute_area_quantity(item: &BOQItem, region: &Region, default_wall_height: f64) -> QuantityResult {
    if region.area >= LINEAR_AREA_THRESHOLD || region.perimeter <= 0.0 {
        return QuantityResult {
            qty: region.area,
            detected_height: None,
            used_linear_to_area: false,
            reason_suffix: "used region area".to_string(),
        };
    }

    let description = item.normalized_description();
    let is_horizontal = HORIZONTAL_KEYWORDS.iter().any(|kw| description.contains(kw));

    if is_horizontal {
        let hull_area = convex_hull_area(&region.boundary);
        QuantityResult {
            qty: hull_area,
            detected_height: None,
            used_linear_to_area: true,
            reason_suffix: "linear region treated as horizontal; used convex-hull area".to_string(),
        }
    } else {
        let DetectedHeight { meters, source_label } =
            detect_wall_height(&region.associated_text, region.centroid, default_wall_height);
        let qty = region.perimeter * meters;
        let reason = match source_label {
            Some(label) => format!("linear region treated as vertical; wall height {meters:.2}m from label \"{label}\""),
            None => format!("linear region treated as vertical; wall-height fallback to default {meters:.2}m"),
        };
        QuantityResult { qty, detected_height: Some(meters), used_linear_to_area: true, reason_suffix: reason }
    }
}

pub(crate) fn convex_hull_area(boundary: &[core_model::Point]) -> f64 {
    if boundary.len() < 3 {
        return 0.0;
    }
    let mut coords: Vec<geo::Coord<f64>> = boundary.iter().map(|p| coord! { x: p.x, y: p.y }).collect();
    if coords.first() != coords.last() {
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
    }
    let polygon = Polygon::new(LineString::new(coords), vec![]);
    polygon.convex_hull().unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{BOQItem, Point, RegionKind, Resolution, SemanticClass};

    fn boq(description: &str, unit_family: UnitFamily) -> BOQItem {
        BOQItem { id: 1, description: description.to_string(), unit: "m2".into(), unit_family, expected_qty: None }
    }

    fn linear_region(perimeter: f64) -> Region {
        Region {
            id: 1,
            boundary: vec![Point::new(0.0, 0.0), Point::new(perimeter / 2.0, 0.0)],
            area: 0.0,
            perimeter,
            centroid: Point::new(perimeter / 4.0, 0.0),
            kind: RegionKind::Extracted,
            resolution: Resolution::Medium,
            source_layers: vec!["a-arq-tabiques".into()],
            semantic_class: SemanticClass::Unknown,
            associated_text: Vec::new(),
        }
    }

    #[test]
    fn count_unit_always_yields_one() {
        let item = boq("puerta", UnitFamily::Count);
        let region = linear_region(10.0);
        let result = compute_quantity(&item, &region, 2.4);
        assert_eq!(result.qty, 1.0);
    }

    #[test]
    fn linear_unit_uses_perimeter() {
        let item = boq("zocalo", UnitFamily::Linear);
        let region = linear_region(12.0);
        let result = compute_quantity(&item, &region, 2.4);
        assert_eq!(result.qty, 12.0);
    }

    #[test]
    fn area_unit_on_degenerate_region_falls_back_to_wall_height() {
        let item = boq("Pintura tabique", UnitFamily::Area);
        let region = linear_region(10.0);
        let result = compute_quantity(&item, &region, 2.4);
        assert!((result.qty - 24.0).abs() < 1e-9);
        assert_eq!(result.detected_height, Some(2.4));
    }
}
