//! Regular polygon and star generation.
//!
//! A polygon object stores one edge (the seed path) in unit space plus the
//! ellipse the finished shape is fitted into.

use super::path::Path;
use super::transform::Transform;
use std::f64::consts::PI;

/// Polygons with more corners than this are rejected as corrupt.
pub const MAX_POLYGON_ANGLES: u32 = 1024;

/// Polygon descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    pub num_angles: u32,
    /// Star skip: connect every `next_point`-th corner
    pub next_point: u32,
    pub rx: f64,
    pub ry: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Polygon {
    pub fn new(num_angles: u32, next_point: u32, rx: f64, ry: f64, cx: f64, cy: f64) -> Self {
        Self {
            num_angles,
            next_point,
            rx,
            ry,
            cx,
            cy,
        }
    }

    fn is_valid(&self) -> bool {
        self.num_angles != 0 && self.next_point != 0 && self.num_angles <= MAX_POLYGON_ANGLES
    }

    /// Expand `path`, which holds the seed edge, into the full polygon.
    ///
    /// When `next_point` does not divide `num_angles` the star is one
    /// continuous stroke; otherwise it is `next_point` separate closed
    /// sub-polygons. The result is fitted into the ellipse
    /// `(rx, ry, cx, cy)`. Invalid descriptors leave `path` untouched.
    pub fn create(&self, path: &mut Path) {
        if !self.is_valid() {
            log::debug!(
                "Skipping polygon with {} angles and next point {}",
                self.num_angles,
                self.next_point
            );
            return;
        }

        let mut seed = path.clone();
        let step = 2.0 * PI / self.num_angles as f64;
        let turn = rotation(self.next_point as f64 * step);

        if self.num_angles % self.next_point != 0 {
            for _ in 1..self.num_angles {
                seed.transform(&turn);
                path.append_path(&seed);
            }
        } else {
            let shift = rotation(step);
            for i in 0..self.next_point {
                if i > 0 {
                    seed.transform(&shift);
                    path.append_path(&seed);
                }
                for _ in 1..self.num_angles / self.next_point {
                    seed.transform(&turn);
                    path.append_path(&seed);
                }
                path.append_close_path();
            }
        }
        path.append_close_path();

        path.transform(&Transform::new(self.rx, 0.0, self.cx, 0.0, self.ry, self.cy));
    }
}

/// Per-step rotation in the polygon's own winding direction.
fn rotation(angle: f64) -> Transform {
    let (sin, cos) = angle.sin_cos();
    Transform::new(cos, sin, 0.0, -sin, cos, 0.0)
}
