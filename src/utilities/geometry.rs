// src/utilities/geometry.rs
//
// 2D helpers: segment intersection, bearings between points, rotation.

use nannou::prelude::*;

use super::trig::{cos_deg, sin_deg};

/// Intersection of the line through `a1`-`a2` with the segment `b1`-`b2`.
///
/// The first line is always treated as unbounded; the second is bounded to
/// its segment unless `include_extension` is set. Degenerate segments and
/// parallel lines return None.
pub fn intersect_lines(
    a1: Point2,
    a2: Point2,
    b1: Point2,
    b2: Point2,
    include_extension: bool,
) -> Option<Point2> {
    if a1 == a2 || b1 == b2 {
        return None;
    }

    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let denominator = d2.y * d1.x - d2.x * d1.y;
    if denominator == 0.0 {
        return None;
    }

    let ua = (d2.x * (a1.y - b1.y) - d2.y * (a1.x - b1.x)) / denominator;
    let ub = (d1.x * (a1.y - b1.y) - d1.y * (a1.x - b1.x)) / denominator;
    if !include_extension && !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(a1 + d1 * ua)
}

/// Bearing from (x1, y1) to (x2, y2) in degrees, [0, 360), counter-clockwise
/// on a y-down canvas.
pub fn calculate_angle(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let degrees = (-(y2 - y1)).atan2(x2 - x1).to_degrees();
    ((degrees % 360.0) + 360.0) % 360.0
}

pub fn dist(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x2 - x1).hypot(y2 - y1)
}

/// Rotates `point` around `center` by `angle` degrees using the lookup
/// tables. Positive angles turn counter-clockwise on a y-down canvas.
pub fn rotate_about(center: Point2, point: Point2, angle: f32) -> Point2 {
    let (cos, sin) = (cos_deg(angle), sin_deg(angle));
    let d = point - center;
    pt2(
        cos * d.x + sin * d.y + center.x,
        cos * d.y - sin * d.x + center.y,
    )
}
