// src/painter/shapes.rs
//
// Geometry helpers on top of the stroke, fill, hatch and cover passes:
// rectangles, circles, arcs, polygons, splines and recorded shapes.

use nannou::prelude::*;
use std::f32::consts::PI;

use super::painter::Painter;
use crate::models::Polygon;
use crate::path::{create_spline, Plot, PlotKind, SplinePoint};
use crate::render::Canvas;
use crate::utilities::{constrain, cos_deg, sin_deg};

/// Side factor for polygons traced around plots that get hatched or
/// covered.
const HATCH_SIDE: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectMode {
    /// (x, y) is the top-left corner.
    #[default]
    Corner,
    /// (x, y) is the centre.
    Center,
}

/// A shape or stroke being recorded between begin_* and end_*.
#[derive(Debug, Clone)]
pub(super) enum Recording {
    Shape { curvature: f32, points: Vec<SplinePoint> },
    Stroke { plot: Plot, origin: Point2 },
}

impl<C: Canvas> Painter<C> {
    /// Fills, hatches, outlines and covers `polygon`, in that order.
    pub fn polygon(&mut self, points: &[[f32; 2]]) {
        self.show_polygon(&Polygon::from_points(points));
    }

    pub(super) fn show_polygon(&mut self, polygon: &Polygon) {
        self.fill_area(polygon);
        self.hatch_polygons(std::slice::from_ref(polygon));
        self.outline(polygon);
        self.cover(polygon);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, mode: RectMode) {
        let (x, y) = match mode {
            RectMode::Corner => (x, y),
            RectMode::Center => (x - w / 2.0, y - h / 2.0),
        };
        let corners = [[x, y], [x + w, y], [x + w, y + h], [x, y + h]];
        if self.context.field.is_some() {
            // Sides bend with the field, so the rect becomes a shape
            self.begin_shape(0.0);
            for [cx, cy] in corners {
                self.vertex(cx, cy, 1.0);
            }
            self.end_shape(true);
        } else {
            self.polygon(&corners);
        }
    }

    /// Circle of `radius` drawn as four quarter arcs. `irregular` jitters
    /// each quarter and leaves a small overlap or gap where it closes.
    pub fn circle(&mut self, x: f32, y: f32, radius: f32, irregular: bool) {
        let mut plot = Plot::new(PlotKind::Curved);
        let quarter = PI * radius / 2.0;
        let angle = self.rand.random(0.0, 360.0);
        for k in 0..4 {
            let jitter_angle = if irregular { self.rand.random(-1.0, 1.0) } else { 0.0 };
            let jitter_length = if irregular { self.rand.random(-1.0, 1.0) } else { 0.0 };
            plot.add_segment(angle - 90.0 * k as f32 + jitter_angle, quarter + jitter_length, 1.0, true);
        }
        let closing = if irregular { self.rand.rand_int(-5, 5) as f32 } else { 0.0 };
        if irregular {
            plot.add_segment(angle, closing.to_radians() * radius, 1.0, true);
        }
        plot.end_plot(closing + angle, 1.0, true);

        let start = (x - radius * sin_deg(angle), y - radius * cos_deg(-angle));
        self.show_plot(&mut plot, start.0, start.1, 1.0);
    }

    /// Stroke along the circle of `radius` from `start` to `end` degrees.
    pub fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let mut plot = Plot::new(PlotKind::Curved);
        let (a1, a2) = (270.0 - start, 270.0 - end);
        let length = PI * radius * (end - start) / 180.0;
        plot.add_segment(a1, length, 1.0, true);
        plot.end_plot(a2, 1.0, true);
        let (sx, sy) = (x + radius * cos_deg(-a1 - 90.0), y + radius * sin_deg(-a1 - 90.0));
        self.stroke_plot(&plot, sx, sy, 1.0);
    }

    /// Strokes a spline through `points` (x, y, pressure).
    pub fn spline(&mut self, points: &[[f32; 3]], curvature: f32) {
        let points: Vec<SplinePoint> = points.iter().map(|p| SplinePoint::new(p[0], p[1], p[2])).collect();
        let plot = create_spline(&points, curvature, false);
        if let Some(origin) = plot.origin() {
            self.stroke_plot(&plot, origin.x, origin.y, 1.0);
        }
    }

    /// Starts recording vertices. Curvature 0 keeps sharp corners.
    pub fn begin_shape(&mut self, curvature: f32) {
        self.recording = Some(Recording::Shape {
            curvature: constrain(curvature, 0.0, 1.0),
            points: Vec::new(),
        });
    }

    pub fn vertex(&mut self, x: f32, y: f32, pressure: f32) {
        match &mut self.recording {
            Some(Recording::Shape { points, .. }) => points.push(SplinePoint::new(x, y, pressure)),
            _ => log::warn!("vertex outside begin_shape/end_shape"),
        }
    }

    /// Draws the recorded shape. Sharp shapes with no field are plain
    /// polygons; everything else becomes a spline plot.
    pub fn end_shape(&mut self, close: bool) {
        let Some(Recording::Shape { curvature, mut points }) = self.recording.take() else {
            log::warn!("end_shape without begin_shape");
            return;
        };
        if points.is_empty() {
            return;
        }
        if curvature == 0.0 && self.context.field.is_none() {
            let polygon = Polygon::new(points.iter().map(|p| p.point).collect());
            self.show_polygon(&polygon);
            return;
        }
        if close && points.len() > 1 {
            points.push(points[0]);
            points.push(points[1]);
        }
        let mut plot = create_spline(&points, curvature, close);
        let origin = plot.origin().unwrap_or(points[0].point);
        self.show_plot(&mut plot, origin.x, origin.y, 1.0);
    }

    /// Starts a stroke built from explicit segments.
    pub fn begin_stroke(&mut self, kind: PlotKind, x: f32, y: f32) {
        self.recording = Some(Recording::Stroke {
            plot: Plot::new(kind),
            origin: pt2(x, y),
        });
    }

    /// Adds a segment heading `angle` degrees for `length`, starting at
    /// `pressure`.
    pub fn segment(&mut self, angle: f32, length: f32, pressure: f32) {
        match &mut self.recording {
            Some(Recording::Stroke { plot, .. }) => plot.add_segment(angle, length, pressure, true),
            _ => log::warn!("segment outside begin_stroke/end_stroke"),
        }
    }

    /// Closes the stroke with its final angle and pressure and draws it.
    pub fn end_stroke(&mut self, angle: f32, pressure: f32) {
        let Some(Recording::Stroke { mut plot, origin }) = self.recording.take() else {
            log::warn!("end_stroke without begin_stroke");
            return;
        };
        plot.end_plot(angle, pressure, true);
        self.stroke_plot(&plot, origin.x, origin.y, 1.0);
    }

    /// Stroke pass of a plot. Plots that carry an origin draw there at
    /// scale 1.
    fn stroke_plot(&mut self, plot: &Plot, x: f32, y: f32, scale: f32) {
        if !self.context.stroke.active {
            return;
        }
        let (x, y, scale) = match plot.origin() {
            Some(o) => (o.x, o.y, 1.0),
            None => (x, y, scale),
        };
        self.plot(plot, x, y, scale);
    }

    /// Stroke, fill, hatch and cover passes of a plot.
    fn show_plot(&mut self, plot: &mut Plot, x: f32, y: f32, scale: f32) {
        self.stroke_plot(plot, x, y, scale);
        let (x, y, scale) = match plot.origin() {
            Some(o) => (o.x, o.y, 1.0),
            None => (x, y, scale),
        };
        if self.context.fill.active {
            let side = self.context.fill.bleed.strength * 3.0;
            let polygon = self.trace(plot, x, y, scale, side);
            self.fill_area(&polygon);
        }
        if self.context.hatch.active {
            let polygon = self.trace(plot, x, y, scale, HATCH_SIDE);
            self.hatch_polygons(std::slice::from_ref(&polygon));
        }
        if self.context.erase.active {
            let polygon = self.trace(plot, x, y, scale, HATCH_SIDE);
            self.cover(&polygon);
        }
    }

    fn trace(&mut self, plot: &mut Plot, x: f32, y: f32, scale: f32, side: f32) -> Polygon {
        let field = self
            .field
            .view(self.context.field.as_deref(), self.field_offset());
        plot.to_polygon(x, y, scale, side, &field, &mut self.rand)
    }
}
