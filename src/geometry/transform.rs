//! Affine transforms over document-space points.
//!
//! A [`Transform`] is the 2x3 matrix
//!
//! ```text
//! | v0 v1 x0 |
//! | v3 v4 y0 |
//! ```
//!
//! applied as `x' = v0·x + v1·y + x0`, `y' = v3·x + v4·y + y0`.

use std::f64::consts::FRAC_PI_4;

/// Magnitudes below this are treated as zero by the arc reparametrization.
pub(crate) const EPSILON: f64 = 1e-10;

#[inline]
pub(crate) fn almost_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Document-space coordinate, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Elliptical arc parameters as carried by an arc-to command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse's x axis, in radians
    pub rotation: f64,
    pub sweep: bool,
    /// End point of the arc
    pub end: Point,
}

/// 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub v0: f64,
    pub v1: f64,
    pub x0: f64,
    pub v3: f64,
    pub v4: f64,
    pub y0: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Arguments follow the record layout: the first row, then the second row.
    #[inline]
    pub const fn new(v0: f64, v1: f64, x0: f64, v3: f64, v4: f64, y0: f64) -> Self {
        Self {
            v0,
            v1,
            x0,
            v3,
            v4,
            y0,
        }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// Counterclockwise rotation about the origin.
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, -sin, 0.0, sin, cos, 0.0)
    }

    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.v0 * self.v4 - self.v1 * self.v3
    }

    pub fn is_identity(&self) -> bool {
        almost_zero(self.v0 - 1.0)
            && almost_zero(self.v1)
            && almost_zero(self.x0)
            && almost_zero(self.v3)
            && almost_zero(self.v4 - 1.0)
            && almost_zero(self.y0)
    }

    /// Transform a point. Both outputs are computed from the original `x`.
    #[inline]
    pub fn apply_to_point(&self, point: Point) -> Point {
        Point {
            x: self.v0 * point.x + self.v1 * point.y + self.x0,
            y: self.v3 * point.x + self.v4 * point.y + self.y0,
        }
    }

    /// Transform an elliptical arc.
    ///
    /// The ellipse is modelled as the unit circle under
    /// `rotate(rotation) · scale(rx, ry)`; folding that into this transform's
    /// linear part gives a matrix `M` whose `M·Mᵀ = [[A, B/2], [B/2, C]]`
    /// holds the squared half-axes as eigenvalues.
    pub fn apply_to_arc(&self, arc: ArcParams) -> ArcParams {
        let end = self.apply_to_point(arc.end);

        let (sin, cos) = arc.rotation.sin_cos();
        let v0 = (self.v0 * cos + self.v1 * sin) * arc.rx;
        let v1 = (self.v1 * cos - self.v0 * sin) * arc.ry;
        let v3 = (self.v3 * cos + self.v4 * sin) * arc.rx;
        let v4 = (self.v4 * cos - self.v3 * sin) * arc.ry;

        // centered implicit equation
        let a = v0 * v0 + v1 * v1;
        let c = v3 * v3 + v4 * v4;
        let b = 2.0 * (v0 * v3 + v1 * v4);

        let (r1, r2, rotation) = if almost_zero(b) {
            (a, c, 0.0)
        } else if almost_zero(a - c) {
            (a + b / 2.0, a - b / 2.0, FRAC_PI_4)
        } else {
            let radical = 1.0 + b * b / ((a - c) * (a - c));
            let radical = if radical < 0.0 { 0.0 } else { radical.sqrt() };
            // With A < C, r1 is the minor axis and the major axis lies along `rotation`.
            let r1 = (a + c + radical * (a - c)) / 2.0;
            let r2 = (a + c - radical * (a - c)) / 2.0;
            let rotation = b.atan2(a - c) / 2.0;
            if a - c <= 0.0 {
                (r2, r1, rotation)
            } else {
                (r1, r2, rotation)
            }
        };

        let rx = if r1 < 0.0 { 0.0 } else { r1.sqrt() };
        let ry = if r2 < 0.0 { 0.0 } else { r2.sqrt() };

        // A reflection reverses the direction the arc is traced in.
        let flipped = self.v0 * self.v4 < self.v3 * self.v1;

        ArcParams {
            rx,
            ry,
            rotation,
            sweep: arc.sweep != flipped,
            end,
        }
    }

    /// The transform that applies `self` first and `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            v0: next.v0 * self.v0 + next.v1 * self.v3,
            v1: next.v0 * self.v1 + next.v1 * self.v4,
            x0: next.v0 * self.x0 + next.v1 * self.y0 + next.x0,
            v3: next.v3 * self.v0 + next.v4 * self.v3,
            v4: next.v3 * self.v1 + next.v4 * self.v4,
            y0: next.v3 * self.x0 + next.v4 * self.y0 + next.y0,
        }
    }

    /// Inverse transform, or `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if almost_zero(det) || !det.is_finite() {
            return None;
        }
        let v0 = self.v4 / det;
        let v1 = -self.v1 / det;
        let v3 = -self.v3 / det;
        let v4 = self.v0 / det;
        Some(Transform {
            v0,
            v1,
            x0: -(v0 * self.x0 + v1 * self.y0),
            v3,
            v4,
            y0: -(v3 * self.x0 + v4 * self.y0),
        })
    }
}

/// Ordered list of transforms, applied first to last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transforms {
    transforms: Vec<Transform>,
}

impl Transforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transform> {
        self.transforms.iter()
    }

    pub fn apply_to_point(&self, point: Point) -> Point {
        self.transforms
            .iter()
            .fold(point, |p, t| t.apply_to_point(p))
    }

    pub fn apply_to_arc(&self, arc: ArcParams) -> ArcParams {
        self.transforms.iter().fold(arc, |a, t| t.apply_to_arc(a))
    }

    /// Collapse the list into one equivalent transform.
    pub fn combined(&self) -> Transform {
        self.transforms
            .iter()
            .fold(Transform::identity(), |acc, t| acc.then(t))
    }
}

impl FromIterator<Transform> for Transforms {
    fn from_iter<I: IntoIterator<Item = Transform>>(iter: I) -> Self {
        Self {
            transforms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    /// Angles describing the same axis are equal modulo π.
    fn assert_same_axis(a: f64, b: f64) {
        let diff = (a - b).rem_euclid(PI);
        assert!(diff < 1e-9 || PI - diff < 1e-9, "{a} vs {b}");
    }

    fn arc(rx: f64, ry: f64, rotation: f64, sweep: bool) -> ArcParams {
        ArcParams {
            rx,
            ry,
            rotation,
            sweep,
            end: Point::new(3.0, -2.0),
        }
    }

    #[test]
    fn test_apply_to_point_uses_original_x() {
        let t = Transform::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(t.apply_to_point(Point::new(2.0, 5.0)), Point::new(5.0, 2.0));
    }

    #[test]
    fn test_apply_to_point_translates() {
        let t = Transform::new(2.0, 0.0, 1.0, 0.0, 3.0, -1.0);
        assert_eq!(t.apply_to_point(Point::new(1.0, 1.0)), Point::new(3.0, 2.0));
    }

    #[test]
    fn test_identity_leaves_arc_unchanged() {
        for sweep in [false, true] {
            let input = arc(4.0, 2.0, 0.3, sweep);
            let out = Transform::identity().apply_to_arc(input);
            assert_close(out.rx, 4.0);
            assert_close(out.ry, 2.0);
            assert_close(out.rotation, 0.3);
            assert_eq!(out.sweep, sweep);
            assert_eq!(out.end, input.end);
        }
    }

    #[test]
    fn test_rotation_adds_to_arc_rotation() {
        let theta = 0.7;
        let out = Transform::rotation(theta).apply_to_arc(arc(5.0, 1.0, 0.2, true));
        assert_close(out.rx, 5.0);
        assert_close(out.ry, 1.0);
        assert_same_axis(out.rotation, 0.2 + theta);
        assert!(out.sweep);
    }

    #[test]
    fn test_axis_aligned_scale() {
        let out = Transform::scale(2.0, 3.0).apply_to_arc(arc(1.0, 1.0, 0.0, false));
        assert_close(out.rotation, 0.0);
        assert_close(out.rx, 2.0);
        assert_close(out.ry, 3.0);
    }

    #[test]
    fn test_circle_under_shear_uses_quarter_turn_branch() {
        // M·Mᵀ has equal diagonal entries: A == C, B != 0.
        let shear = Transform::new(1.0, 0.5, 0.0, 0.5, 1.0, 0.0);
        let out = shear.apply_to_arc(arc(1.0, 1.0, 0.0, false));
        assert_close(out.rotation, FRAC_PI_4);
        assert_close(out.rx, 1.5);
        assert_close(out.ry, 0.5);
        assert!(!out.sweep);
    }

    #[test]
    fn test_reflection_flips_sweep() {
        let mirror = Transform::scale(-1.0, 1.0);
        assert!(mirror.apply_to_arc(arc(2.0, 1.0, 0.0, false)).sweep);
        assert!(!mirror.apply_to_arc(arc(2.0, 1.0, 0.0, true)).sweep);
    }

    #[test]
    fn test_degenerate_arc_radii_are_non_negative() {
        let collapse = Transform::new(1.0, 1.0, 0.0, 1.0, 1.0, 0.0);
        let out = collapse.apply_to_arc(arc(3.0, 3.0, 0.4, false));
        assert!(out.rx >= 0.0 && out.ry >= 0.0);
        assert!(out.rx.is_finite() && out.ry.is_finite());
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        assert!(Transform::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_transforms_apply_in_order() {
        let list: Transforms = [Transform::scale(2.0, 2.0), Transform::translation(1.0, 0.0)]
            .into_iter()
            .collect();
        assert_eq!(list.apply_to_point(Point::new(1.0, 1.0)), Point::new(3.0, 2.0));
        assert_eq!(list.combined().apply_to_point(Point::new(1.0, 1.0)), Point::new(3.0, 2.0));
    }

    proptest! {
        #[test]
        fn prop_inverse_round_trip(
            v0 in -10.0f64..10.0, v1 in -10.0f64..10.0, x0 in -100.0f64..100.0,
            v3 in -10.0f64..10.0, v4 in -10.0f64..10.0, y0 in -100.0f64..100.0,
            x in -1000.0f64..1000.0, y in -1000.0f64..1000.0,
        ) {
            let t = Transform::new(v0, v1, x0, v3, v4, y0);
            prop_assume!(t.determinant().abs() > 1e-3);
            let inv = t.inverse().unwrap();
            let back = inv.apply_to_point(t.apply_to_point(Point::new(x, y)));
            let scale = 1.0 + x.abs().max(y.abs());
            prop_assert!((back.x - x).abs() < 1e-6 * scale * 1e3);
            prop_assert!((back.y - y).abs() < 1e-6 * scale * 1e3);
        }

        #[test]
        fn prop_arc_radii_are_finite_and_non_negative(
            v0 in -5.0f64..5.0, v1 in -5.0f64..5.0,
            v3 in -5.0f64..5.0, v4 in -5.0f64..5.0,
            rx in 0.0f64..10.0, ry in 0.0f64..10.0, rotation in -3.2f64..3.2,
        ) {
            let t = Transform::new(v0, v1, 0.0, v3, v4, 0.0);
            let out = t.apply_to_arc(arc(rx, ry, rotation, false));
            prop_assert!(out.rx >= 0.0 && out.rx.is_finite());
            prop_assert!(out.ry >= 0.0 && out.ry.is_finite());
        }
    }
}
