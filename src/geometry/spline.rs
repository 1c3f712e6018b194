//! Spline flattening into path commands.

use super::path::Path;
use super::transform::Point;
use smallvec::SmallVec;

/// Control points plus per-point knot flags.
///
/// A zero knot closes the run that ends at its point. Runs of two points
/// become a line, three a quadratic bezier, four or more a generic spline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineData {
    pub points: Vec<Point>,
    pub knot_vector: Vec<u32>,
}

impl SplineData {
    pub fn new(points: Vec<Point>, knot_vector: Vec<u32>) -> Self {
        Self {
            points,
            knot_vector,
        }
    }

    /// Append the flattened spline to `path`. Empty input is a no-op.
    pub fn create(&self, path: &mut Path) {
        let (Some(&first), false) = (self.points.first(), self.knot_vector.is_empty()) else {
            return;
        };
        path.append_move_to(first.x, first.y);

        let mut run: SmallVec<[Point; 8]> = SmallVec::new();
        run.push(first);
        let count = self.points.len().min(self.knot_vector.len());
        for i in 1..count {
            let point = self.points[i];
            run.push(point);
            if self.knot_vector[i] == 0 {
                flush_run(path, &run);
                run.clear();
                run.push(point);
            }
        }
        if run.len() >= 2 {
            flush_run(path, &run);
        }
    }
}

fn flush_run(path: &mut Path, run: &[Point]) {
    match run {
        [_] | [] => {},
        [_, end] => path.append_line_to(end.x, end.y),
        [_, control, end] => path.append_quadratic_bezier_to(control.x, control.y, end.x, end.y),
        _ => path.append_spline_to(run),
    }
}
