// Object geometry records
//
// A `loda` record is a small self-describing table: a fixed header, a list
// of argument offsets and a parallel list of argument types. The geometry
// argument is decoded according to the object's chunk type; the fill and
// outline arguments are plain style IDs.

use super::read_count;
use super::units::Units;
use crate::common::binary::{ByteReader, Endian};
use crate::common::error::{Error, Result};
use crate::geometry::{Path, Point, Polygon, SplineData, Transform, Transforms};
use smallvec::SmallVec;
use std::f64::consts::PI;

/// Argument types in a `loda` table
pub mod arg_type {
    pub const OUTLINE_ID: u32 = 0x0a;
    pub const FILL_ID: u32 = 0x14;
    pub const GEOMETRY: u32 = 0x1e;
}

/// Geometry chunk types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ChunkType {
    Rectangle = 0x01,
    Ellipse = 0x02,
    LineAndCurve = 0x03,
    Polygon = 0x14,
    Spline = 0x26,
}

impl ChunkType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x01 => Some(Self::Rectangle),
            0x02 => Some(Self::Ellipse),
            0x03 => Some(Self::LineAndCurve),
            0x14 => Some(Self::Polygon),
            0x26 => Some(Self::Spline),
            _ => None,
        }
    }
}

/// Point types of line-and-curve geometry
mod point_type {
    pub const SEGMENT_MASK: u8 = 0xC0;
    pub const MOVE: u8 = 0x00;
    pub const LINE: u8 = 0x40;
    pub const CURVE_END: u8 = 0x80;
    pub const CLOSE: u8 = 0x08;
}

/// Decoded contents of one `loda` record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectData {
    pub path: Path,
    pub fill_id: Option<u32>,
    pub outline_id: Option<u32>,
}

/// Decode a `loda` payload.
pub fn read_object(units: &Units, body: &[u8]) -> Result<ObjectData> {
    let mut header = ByteReader::new(body, Endian::Little);
    let chunk_length = header.read_u32()? as usize;
    let arg_count = header.read_u32()? as usize;
    let args_offset = header.read_u32()? as usize;
    let types_offset = header.read_u32()? as usize;
    let chunk_type = header.read_u32()?;

    let chunk = &body[..chunk_length.min(body.len())];
    let offsets = read_table(chunk, args_offset, arg_count)?;
    let types = read_table(chunk, types_offset, arg_count)?;

    let mut object = ObjectData::default();
    for (offset, kind) in offsets.into_iter().zip(types) {
        let mut arg = ByteReader::new(chunk, Endian::Little);
        arg.seek(offset as usize)?;
        match kind {
            arg_type::GEOMETRY => match ChunkType::from_u32(chunk_type) {
                Some(ChunkType::Rectangle) => object.path = read_rectangle(units, &mut arg)?,
                Some(ChunkType::Ellipse) => object.path = read_ellipse(units, &mut arg)?,
                Some(ChunkType::LineAndCurve) => object.path = read_points(units, &mut arg)?,
                Some(ChunkType::Polygon) => object.path = read_polygon(units, &mut arg)?,
                Some(ChunkType::Spline) => object.path = read_spline(units, &mut arg)?,
                None => log::debug!("Skipping geometry of chunk type 0x{chunk_type:02x}"),
            },
            arg_type::FILL_ID => object.fill_id = Some(arg.read_u32()?),
            arg_type::OUTLINE_ID => object.outline_id = Some(arg.read_u32()?),
            _ => {},
        }
    }
    Ok(object)
}

fn read_table(chunk: &[u8], offset: usize, count: usize) -> Result<Vec<u32>> {
    let mut reader = ByteReader::new(chunk, Endian::Little);
    reader.seek(offset)?;
    if count.checked_mul(4).is_none_or(|size| size > reader.remaining()) {
        return Err(Error::ParseError(format!(
            "Argument table of {count} entries at offset {offset} overruns the record"
        )));
    }
    (0..count)
        .map(|_| reader.read_u32().map_err(Error::from))
        .collect()
}

/// `trfd` payload: a list of affine transforms with translations in
/// coordinate units.
pub fn read_transforms(units: &Units, body: &[u8]) -> Result<Transforms> {
    let mut reader = ByteReader::new(body, Endian::Little);
    let count = read_count(&mut reader, 6 * 8, "transforms")?;
    let scale = units.units_per_inch();
    let mut transforms = Transforms::new();
    for _ in 0..count {
        let v0 = reader.read_f64()?;
        let v1 = reader.read_f64()?;
        let x0 = reader.read_f64()? / scale;
        let v3 = reader.read_f64()?;
        let v4 = reader.read_f64()?;
        let y0 = reader.read_f64()? / scale;
        transforms.push(Transform::new(v0, v1, x0, v3, v4, y0));
    }
    Ok(transforms)
}

fn read_point(units: &Units, reader: &mut ByteReader<'_>) -> Result<Point> {
    let x = units.read_coordinate(reader)?;
    let y = units.read_coordinate(reader)?;
    Ok(Point::new(x, y))
}

/// Rectangle from the origin to `(width, height)`, with quadratic corners
/// when the corner radius is positive.
fn read_rectangle(units: &Units, reader: &mut ByteReader<'_>) -> Result<Path> {
    let width = units.read_coordinate(reader)?;
    let height = units.read_coordinate(reader)?;
    let radius = units
        .read_coordinate(reader)?
        .min(width.abs() / 2.0)
        .min(height.abs() / 2.0);

    let mut path = Path::new();
    if radius > 0.0 {
        let rx = radius.copysign(width);
        let ry = radius.copysign(height);
        path.append_move_to(rx, 0.0);
        path.append_line_to(width - rx, 0.0);
        path.append_quadratic_bezier_to(width, 0.0, width, ry);
        path.append_line_to(width, height - ry);
        path.append_quadratic_bezier_to(width, height, width - rx, height);
        path.append_line_to(rx, height);
        path.append_quadratic_bezier_to(0.0, height, 0.0, height - ry);
        path.append_line_to(0.0, ry);
        path.append_quadratic_bezier_to(0.0, 0.0, rx, 0.0);
    } else {
        path.append_move_to(0.0, 0.0);
        path.append_line_to(width, 0.0);
        path.append_line_to(width, height);
        path.append_line_to(0.0, height);
    }
    path.append_close_path();
    Ok(path)
}

/// Ellipse inscribed in the box from the origin to `(width, height)`.
///
/// Equal start and end angles draw the full ellipse; otherwise an arc,
/// closed through the centre when the pie flag is set.
fn read_ellipse(units: &Units, reader: &mut ByteReader<'_>) -> Result<Path> {
    let width = units.read_coordinate(reader)?;
    let height = units.read_coordinate(reader)?;
    let start = units.read_angle(reader)?;
    let end = units.read_angle(reader)?;
    let pie = reader.read_u8()? != 0;

    let (cx, cy) = (width / 2.0, height / 2.0);
    let (rx, ry) = (cx.abs(), cy.abs());
    let on_ellipse = |angle: f64| Point::new(cx + rx * angle.cos(), cy + ry * angle.sin());

    let mut path = Path::new();
    if start == end {
        path.append_move_to(cx + rx, cy);
        path.append_arc_to(rx, ry, 0.0, false, true, cx - rx, cy);
        path.append_arc_to(rx, ry, 0.0, false, true, cx + rx, cy);
        path.append_close_path();
        return Ok(path);
    }

    let from = on_ellipse(start);
    let to = on_ellipse(end);
    let span = (end - start).rem_euclid(2.0 * PI);
    path.append_move_to(from.x, from.y);
    path.append_arc_to(rx, ry, 0.0, span > PI, true, to.x, to.y);
    if pie {
        path.append_line_to(cx, cy);
        path.append_close_path();
    }
    Ok(path)
}

/// Line-and-curve geometry: points followed by one type byte per point.
fn read_points(units: &Units, reader: &mut ByteReader<'_>) -> Result<Path> {
    let count = read_count(reader, 2 * units.coordinate_size() + 1, "path points")?;
    let points = (0..count)
        .map(|_| read_point(units, reader))
        .collect::<Result<Vec<_>>>()?;
    let types = reader.read_bytes(count)?;

    let mut path = Path::new();
    let mut controls: SmallVec<[Point; 2]> = SmallVec::new();
    for (point, &kind) in points.iter().zip(types) {
        match kind & point_type::SEGMENT_MASK {
            point_type::MOVE => {
                controls.clear();
                path.append_move_to(point.x, point.y);
            },
            point_type::LINE => {
                controls.clear();
                path.append_line_to(point.x, point.y);
            },
            point_type::CURVE_END => {
                match controls.as_slice() {
                    [] => path.append_line_to(point.x, point.y),
                    [control] => {
                        path.append_quadratic_bezier_to(control.x, control.y, point.x, point.y)
                    },
                    [first, second, ..] => path.append_cubic_bezier_to(
                        first.x, first.y, second.x, second.y, point.x, point.y,
                    ),
                }
                controls.clear();
            },
            // 0xC0: control point of the next curve
            _ => controls.push(*point),
        }
        if kind & point_type::CLOSE != 0 {
            path.append_close_path();
        }
    }
    Ok(path)
}

/// Polygon descriptor followed by the seed edge as line-and-curve geometry.
fn read_polygon(units: &Units, reader: &mut ByteReader<'_>) -> Result<Path> {
    let num_angles = reader.read_u32()?;
    let next_point = reader.read_u32()?;
    let rx = units.read_coordinate(reader)?;
    let ry = units.read_coordinate(reader)?;
    let cx = units.read_coordinate(reader)?;
    let cy = units.read_coordinate(reader)?;
    let mut path = read_points(units, reader)?;
    Polygon::new(num_angles, next_point, rx, ry, cx, cy).create(&mut path);
    Ok(path)
}

/// Spline control points with one knot flag per point.
fn read_spline(units: &Units, reader: &mut ByteReader<'_>) -> Result<Path> {
    let count = read_count(reader, 2 * units.coordinate_size() + 4, "spline points")?;
    let points = (0..count)
        .map(|_| read_point(units, reader))
        .collect::<Result<Vec<_>>>()?;
    let knot_vector = (0..count)
        .map(|_| reader.read_u32())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut path = Path::new();
    SplineData::new(points, knot_vector).create(&mut path);
    Ok(path)
}
