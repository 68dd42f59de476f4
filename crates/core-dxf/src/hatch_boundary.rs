//! HATCH boundary extraction, restricted to the "polyline boundary" shape
//! spec.md requires. Bulge arcs are approximated as straight chords between
//! the stored vertices (documented loss, spec.md §4.1 and Open Question
//! "bulge arcs in hatch boundaries", §9 — we take option (a): approximate
//! and surface the loss via a warning rather than densifying).

use core_model::Point;
use dxf::entities::Hatch;

/// One closed boundary ring per polyline boundary path on the hatch, in the
/// hatch's local (pre-transform) coordinates. Non-polyline boundary paths
/// (pure edge-based loops) are outside spec.md's required feature set and
/// are skipped.
pub fn boundary_rings(hatch: &Hatch) -> Vec<Vec<Point>> {
    hatch
        .boundary_paths
        .iter()
        .filter(|path| path.is_polyline)
        .map(|path| {
            path.polyline_vertices
                .iter()
                .map(|v| Point::new(v.x, v.y))
                .collect::<Vec<_>>()
        })
        .filter(|ring: &Vec<Point>| ring.len() >= 3)
        .collect()
}

#[cfg(test)]
mod tests {
    // Exercised indirectly via core-dxf's integration tests (synthetic
    // hatch fixtures); the `dxf` crate's Hatch type has no public
    // constructor cheap enough to build a unit fixture here.
}
