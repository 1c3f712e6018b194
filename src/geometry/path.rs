//! Path model for reconstructed page geometry
//!
//! Paths are built command by command from decoded records and can be
//! transformed in place once the object's transforms are known.

use super::transform::{ArcParams, Point, Transform, Transforms};

/// Path command type
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadraticBezierTo {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    CubicBezierTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// Generic spline through a run of points; the first point is the anchor
    SplineTo {
        points: Vec<Point>,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath,
}

impl PathCommand {
    fn transform(&mut self, trafo: &Transform) {
        let map = |x: &mut f64, y: &mut f64| {
            let p = trafo.apply_to_point(Point::new(*x, *y));
            *x = p.x;
            *y = p.y;
        };
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => map(x, y),
            Self::QuadraticBezierTo { x1, y1, x, y } => {
                map(x1, y1);
                map(x, y);
            },
            Self::CubicBezierTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                map(x1, y1);
                map(x2, y2);
                map(x, y);
            },
            Self::SplineTo { points } => {
                for point in points.iter_mut() {
                    *point = trafo.apply_to_point(*point);
                }
            },
            Self::ArcTo {
                rx,
                ry,
                rotation,
                sweep,
                x,
                y,
                ..
            } => {
                let arc = trafo.apply_to_arc(ArcParams {
                    rx: *rx,
                    ry: *ry,
                    rotation: *rotation,
                    sweep: *sweep,
                    end: Point::new(*x, *y),
                });
                *rx = arc.rx;
                *ry = arc.ry;
                *rotation = arc.rotation;
                *sweep = arc.sweep;
                *x = arc.end.x;
                *y = arc.end.y;
            },
            Self::ClosePath => {},
        }
    }

    /// Every point the command references, control points included.
    fn points(&self) -> Vec<Point> {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } | Self::ArcTo { x, y, .. } => {
                vec![Point::new(*x, *y)]
            },
            Self::QuadraticBezierTo { x1, y1, x, y } => {
                vec![Point::new(*x1, *y1), Point::new(*x, *y)]
            },
            Self::CubicBezierTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => vec![
                Point::new(*x1, *y1),
                Point::new(*x2, *y2),
                Point::new(*x, *y),
            ],
            Self::SplineTo { points } => points.clone(),
            Self::ClosePath => Vec::new(),
        }
    }
}

/// Ordered sequence of drawing commands.
///
/// The first command of a non-empty path is always a move-to: drawing on an
/// empty path starts a sub-path at the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn ensure_started(&mut self) {
        if self.commands.is_empty() {
            self.commands.push(PathCommand::MoveTo { x: 0.0, y: 0.0 });
        }
    }

    pub fn append_move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    pub fn append_line_to(&mut self, x: f64, y: f64) {
        self.ensure_started();
        self.commands.push(PathCommand::LineTo { x, y });
    }

    pub fn append_quadratic_bezier_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.ensure_started();
        self.commands
            .push(PathCommand::QuadraticBezierTo { x1, y1, x, y });
    }

    pub fn append_cubic_bezier_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.ensure_started();
        self.commands.push(PathCommand::CubicBezierTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    pub fn append_spline_to(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        self.ensure_started();
        self.commands.push(PathCommand::SplineTo {
            points: points.to_vec(),
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn append_arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) {
        self.ensure_started();
        self.commands.push(PathCommand::ArcTo {
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            x,
            y,
        });
    }

    pub fn append_close_path(&mut self) {
        if !self.commands.is_empty() {
            self.commands.push(PathCommand::ClosePath);
        }
    }

    /// Append another path, continuing the current sub-path.
    ///
    /// When this path already has commands, the other path's leading move-to
    /// becomes a line-to so the result stays one connected outline.
    pub fn append_path(&mut self, other: &Path) {
        let mut iter = other.commands.iter();
        if !self.commands.is_empty() {
            if let Some(first) = other.commands.first() {
                match first {
                    PathCommand::MoveTo { x, y } => {
                        self.commands.push(PathCommand::LineTo { x: *x, y: *y });
                    },
                    cmd => self.commands.push(cmd.clone()),
                }
                iter.next();
            }
        }
        self.commands.extend(iter.cloned());
    }

    /// Apply a transform to every point of the path.
    pub fn transform(&mut self, trafo: &Transform) {
        for cmd in &mut self.commands {
            cmd.transform(trafo);
        }
    }

    /// Apply each transform of the list in order.
    pub fn transform_all(&mut self, trafos: &Transforms) {
        for trafo in trafos.iter() {
            self.transform(trafo);
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::ClosePath))
    }

    /// Number of close-path commands, one per closed sub-path.
    pub fn close_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, PathCommand::ClosePath))
            .count()
    }

    /// Bounding box of all referenced points as `(min, max)`.
    ///
    /// Control points are included, so this is the hull of the control
    /// polygon rather than the tight bounds of the curve.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let mut points = self.commands.iter().flat_map(PathCommand::points);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}
