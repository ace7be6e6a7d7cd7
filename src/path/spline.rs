// src/path/spline.rs
//
// Builds a Plot that passes through a list of points. Corners are replaced
// by circular arcs whose size is set by `curvature` (0 keeps sharp corners).

use nannou::prelude::*;
use std::f32::consts::PI;

use super::plot::{Plot, PlotKind};
use crate::utilities::{calculate_angle, cos_deg, intersect_lines, sin_deg};

/// A spline control point with the pressure to apply from it onward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplinePoint {
    pub point: Point2,
    pub pressure: f32,
}

impl SplinePoint {
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            point: pt2(x, y),
            pressure,
        }
    }
}

fn heading(angle: f32) -> Vec2 {
    vec2(cos_deg(angle), sin_deg(angle))
}

fn bearing(a: Point2, b: Point2) -> f32 {
    calculate_angle(a.x, a.y, b.x, b.y)
}

/// Creates the plot for `points`. With `close`, the caller has already
/// appended the first two points again; the plot then starts where the
/// closing arc ends, so the seam is invisible.
pub fn create_spline(points: &[SplinePoint], curvature: f32, close: bool) -> Plot {
    let curvature = curvature.clamp(0.0, 1.0);
    let mut points = points.to_vec();
    // Two points have no corner to round
    let curvature = if points.len() < 3 { 0.0 } else { curvature };

    let kind = if curvature == 0.0 {
        PlotKind::Straight
    } else {
        PlotKind::Curved
    };
    let mut plot = Plot::new(kind);
    if points.is_empty() {
        return plot;
    }
    if curvature == 0.0 && close {
        points.pop();
    }

    let n = points.len();
    let mut done = 0.0;
    let mut first_straight = 0.0;
    let mut first_cut = 0.0;
    let mut closing_origin: Option<Point2> = None;

    for i in 0..n.saturating_sub(1) {
        let (p1, p2) = (points[i], points[i + 1]);

        if curvature == 0.0 {
            let d = p1.point.distance(p2.point);
            let a = bearing(p1.point, p2.point);
            plot.add_segment(a, d, p1.pressure, true);
            if i == n - 2 {
                plot.end_plot(a, p2.pressure, true);
            }
            continue;
        }
        if i + 2 >= n {
            continue;
        }

        let p3 = points[i + 2];
        let d1 = p1.point.distance(p2.point);
        let d2 = p2.point.distance(p3.point);
        let a1 = bearing(p1.point, p2.point);
        let a2 = bearing(p2.point, p3.point);
        let cut = curvature * 0.5 * d1.min(d2);
        let reach = d1.max(d2);
        let (s1, s2) = (d1 - cut, d2 - cut);
        let last_corner = i + 3 == n;

        if a1.floor() == a2.floor() {
            let lead = if close && i == 0 { 0.0 } else { d1 - done };
            let tail = if close {
                if i == 0 { 0.0 } else { d2 - first_cut }
            } else {
                d2
            };
            plot.add_segment(a1, lead, p1.pressure, true);
            if last_corner {
                plot.add_segment(a2, tail, p2.pressure, true);
            }
            done = 0.0;
            if i == 0 {
                first_straight = d1;
                first_cut = cut;
                closing_origin = Some(points[1].point);
            }
        } else {
            // Arc tangent to both legs, centred where their normals meet
            let point1 = p2.point - heading(-a1) * cut;
            let point2 = point1 + heading(-a1 + 90.0) * reach;
            let point3 = p2.point + heading(-a2) * cut;
            let point4 = point3 + heading(-a2 + 90.0) * reach;

            let arc = intersect_lines(point1, point2, point3, point4, true)
                .map(|center| {
                    let radius = point1.distance(center);
                    let half_chord = point1.distance(point3) / 2.0;
                    let sweep = 2.0 * (half_chord / radius).clamp(-1.0, 1.0).asin().to_degrees();
                    2.0 * PI * radius * sweep / 360.0
                })
                .filter(|s| s.is_finite())
                .unwrap_or(0.0);

            let lead = if close && i == 0 { 0.0 } else { s1 - done };
            let tail = if last_corner {
                if close { first_straight - cut } else { s2 }
            } else {
                0.0
            };
            plot.add_segment(a1, lead, p1.pressure, true);
            plot.add_segment(a1, arc, p1.pressure, true);
            plot.add_segment(a2, tail, p2.pressure, true);
            done = cut;
            if i == 0 {
                first_straight = s1;
                first_cut = cut;
                closing_origin = Some(point1);
            }
        }

        if last_corner {
            plot.end_plot(a2, p2.pressure, true);
        }
    }

    let origin = if close && curvature != 0.0 {
        closing_origin.unwrap_or(points[0].point)
    } else {
        points[0].point
    };
    plot.set_origin(origin);
    plot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[[f32; 2]]) -> Vec<SplinePoint> {
        raw.iter().map(|p| SplinePoint::new(p[0], p[1], 1.0)).collect()
    }

    #[test]
    fn test_zero_curvature_is_a_polyline() {
        let plot = create_spline(&pts(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]), 0.0, false);
        assert_eq!(plot.kind(), PlotKind::Straight);
        assert!((plot.total_length() - 20.0).abs() < 1e-4);
        assert_eq!(plot.origin(), Some(pt2(0.0, 0.0)));
        assert!((plot.angle_at(15.0) - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_collinear_points_keep_full_length() {
        let plot = create_spline(&pts(&[[0.0, 0.0], [10.0, 0.0], [20.0, 0.0]]), 0.5, false);
        assert!((plot.total_length() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_right_angle_is_rounded() {
        let plot = create_spline(&pts(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]), 1.0, false);
        assert_eq!(plot.kind(), PlotKind::Curved);
        // 5 straight + quarter arc of radius 5 + 5 straight
        let expected = 10.0 + 2.0 * PI * 5.0 / 4.0;
        assert!((plot.total_length() - expected).abs() < 0.05);
        // Halfway through the arc the tangent points down-right
        let mid_arc = 5.0 + PI * 5.0 / 4.0;
        let a = plot.angle_at(mid_arc);
        assert!((a + 45.0).abs() < 1.0 || (a - 315.0).abs() < 1.0);
    }

    #[test]
    fn test_nearly_collinear_corner_stays_finite() {
        let plot = create_spline(&pts(&[[0.0, 0.0], [10.0, 0.0], [20.0, 1e-4], [30.0, 0.0]]), 1.0, false);
        assert!(plot.angles().iter().all(|a| a.is_finite()));
        assert!(plot.lengths().iter().all(|l| l.is_finite()));
        assert!(plot.total_length().is_finite());
        assert!(plot.total_length() > 0.0 && plot.total_length() <= 30.01);
    }

    #[test]
    fn test_two_points_with_curvature_still_draw() {
        let plot = create_spline(&pts(&[[0.0, 0.0], [0.0, 10.0]]), 0.7, false);
        assert!((plot.total_length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_closed_polyline_returns_home() {
        let mut raw = pts(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        raw.push(raw[0]);
        raw.push(raw[1]);
        let plot = create_spline(&raw, 0.0, true);
        assert!((plot.total_length() - 40.0).abs() < 1e-3);
    }
}
