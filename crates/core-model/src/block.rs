//! Block reference and block-definition metadata.

use crate::geometry::Point;

/// A 2D affine transform applied when exploding an INSERT entity: a full
/// 2x2 linear map (`a b; c d`) plus a translation. Built from DXF's
/// scale/rotation/translation triplet as scale-then-rotate, but stored as
/// a plain matrix so nested compositions (`then`) are exact: once a block
/// with non-uniform scale is nested inside one that also rotates, the
/// composed linear map generally cannot be re-expressed as a single
/// rotation-and-scale pair (it can include shear), so decomposed
/// rotation/scale fields can't carry the composition losslessly.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub translation: Point,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            translation: Point::new(0.0, 0.0),
        }
    }

    /// Build a transform from DXF INSERT-style scale/rotation/translation:
    /// scale first, then rotate, then translate.
    pub fn from_scale_rotation(scale_x: f64, scale_y: f64, rotation: f64, translation: Point) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Self {
            a: cos * scale_x,
            b: -sin * scale_y,
            c: sin * scale_x,
            d: cos * scale_y,
            translation,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.translation.x,
            self.c * p.x + self.d * p.y + self.translation.y,
        )
    }

    /// Compose `self` (applied first, to the innermost block's local
    /// coordinates) followed by `outer` (the transform of everything
    /// enclosing it): `outer.apply(self.apply(p))` for every point `p`.
    /// The linear part is plain 2x2 matrix multiplication (`outer * self`);
    /// the translation is `outer` applied to `self`'s translation, since
    /// that point is itself expressed in the coordinate system `outer`
    /// transforms. Used when exploding nested INSERTs (spec.md §4.1).
    pub fn then(&self, outer: &Transform) -> Transform {
        Transform {
            a: outer.a * self.a + outer.b * self.c,
            b: outer.a * self.b + outer.b * self.d,
            c: outer.c * self.a + outer.d * self.c,
            d: outer.c * self.b + outer.d * self.d,
            translation: outer.apply(self.translation),
        }
    }
}

/// A single INSERT entity reference, already resolved to a flattened
/// transform (nested INSERTs have been composed by the time this is built).
#[derive(Debug, Clone)]
pub struct BlockReference {
    pub block_name: String,
    pub layer: String,
    pub transform: Transform,
}

/// Where a block definition's area estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAreaSource {
    /// Summed shoelace area of closed polylines/hatches within the block.
    Geometry,
    /// Bounding-box area, used when no closed geometry was found.
    Bbox,
}

/// Per-block-definition statistics, grounded in the original's block
/// cubication pass.
#[derive(Debug, Clone)]
pub struct BlockMetadata {
    pub block_name: String,
    pub area: f64,
    pub width: f64,
    pub height: f64,
    pub area_source: BlockAreaSource,
    pub reference_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_noop() {
        let t = Transform::identity();
        let p = Point::new(3.0, 4.0);
        let out = t.apply(p);
        assert!((out.x - 3.0).abs() < 1e-9);
        assert!((out.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_quarter_turn() {
        let t = Transform::from_scale_rotation(1.0, 1.0, std::f64::consts::FRAC_PI_2, Point::new(0.0, 0.0));
        let out = t.apply(Point::new(1.0, 0.0));
        assert!((out.x - 0.0).abs() < 1e-9);
        assert!((out.y - 1.0).abs() < 1e-9);
    }

    /// A non-uniform scale nested inside a rotation (or vice versa) cannot
    /// be re-expressed as a single rotation-then-scale pair; `then` must
    /// compose the full linear maps rather than summing rotations and
    /// multiplying scales independently. outer = scale (2,1), no rotation;
    /// self = unit scale, 90 degree rotation. The true composed map sends
    /// (1,0) to (0,1); naively adding rotations/multiplying scales would
    /// instead apply the combined scale (2,1) *after* a 90 degree turn and
    /// send (1,0) to (0,2).
    #[test]
    fn composition_of_nonuniform_scale_and_rotation_is_exact() {
        let outer = Transform::from_scale_rotation(2.0, 1.0, 0.0, Point::new(0.0, 0.0));
        let inner = Transform::from_scale_rotation(1.0, 1.0, std::f64::consts::FRAC_PI_2, Point::new(0.0, 0.0));
        let composed = inner.then(&outer);
        let out = composed.apply(Point::new(1.0, 0.0));
        assert!((out.x - 0.0).abs() < 1e-9, "x was {}", out.x);
        assert!((out.y - 1.0).abs() < 1e-9, "y was {}", out.y);
    }
}
