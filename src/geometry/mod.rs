// Geometry reconstruction
//
// Pure math over points and transforms: affine maps (including the closed
// form of an elliptical arc under a general affine map), polygon and star
// generation, and spline flattening. Nothing here touches the byte stream.

pub mod path;
pub mod polygon;
pub mod spline;
pub mod transform;

pub use path::{Path, PathCommand};
pub use polygon::Polygon;
pub use spline::SplineData;
pub use transform::{ArcParams, Point, Transform, Transforms};
