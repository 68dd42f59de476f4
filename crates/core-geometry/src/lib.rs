//! Segment cleanup pipeline: vertex snap, collinear merge, gap close and
//! undershoot snap (spec.md §4.3). Each pass is independently toggleable and
//! each catches its own internal errors, returning the input untouched
//! rather than propagating (spec.md §4.12).

pub mod collinear;
pub mod gap_close;
pub mod geom_util;
pub mod grid;
pub mod snap;
pub mod undershoot;

use core_model::{Options, Segment};

pub use collinear::merge_collinear;
pub use gap_close::close_gaps;
pub use snap::snap_vertices;
pub use undershoot::snap_undershoots;

/// Run the full cleanup pipeline in spec order: snap, collinear merge, gap
/// close, undershoot snap. Each stage drops zero-length segments produced
/// by its own work before handing off to the next.
pub fn clean(segments: Vec<Segment>, options: &Options) -> Vec<Segment> {
    let mut working = snap_vertices(segments, options.snap_tolerance);
    working.retain(|s| !s.is_zero_length());

    if options.merge_collinear {
        working = merge_collinear(working, options.collinear_angle_tolerance);
    }

    if options.close_gaps_enabled() {
        working = close_gaps(working, options.max_gap);
    }

    working = snap_undershoots(working, options.undershoot_tolerance());
    working.retain(|s| !s.is_zero_length());
    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EntityType;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64, layer: &str) -> Segment {
        Segment::new((x1, y1).into(), (x2, y2).into(), layer, EntityType::Line)
    }

    #[test]
    fn clean_drops_zero_length_segments() {
        let options = Options::default();
        let segments = vec![seg(0.0, 0.0, 0.0, 0.0, "a"), seg(0.0, 0.0, 1.0, 0.0, "a")];
        let out = clean(segments, &options);
        assert!(out.iter().all(|s| !s.is_zero_length()));
    }
}
