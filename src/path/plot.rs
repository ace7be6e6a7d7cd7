// src/path/plot.rs
//
// A Plot is a path described as ordered (angle, length, pressure) segments.
// Strokes read its tangent and pressure at a distance; fills and hatches
// turn it into a polygon by walking it.

use nannou::prelude::*;
use serde::Deserialize;
use std::cell::Cell;

use crate::field::FieldView;
use crate::models::Polygon;
use crate::path::Position;
use crate::utilities::{map, normalize_degrees, Rand};

/// Sub-step used when approximating a plot with a polygon.
const POLYGON_STEP: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Each segment keeps its own angle until the next one starts.
    Straight,
    /// Angles blend linearly across each segment.
    Curved,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cursor {
    index: usize,
    start: f32,
}

#[derive(Debug, Clone)]
pub struct Plot {
    kind: PlotKind,
    angles: Vec<f32>,
    lengths: Vec<f32>,
    pressures: Vec<f32>,
    rotation: f32,
    total_length: f32,
    origin: Option<Point2>,
    // Walks only move forward, so lookups resume from the last segment
    cursor: Cell<Cursor>,
    polygon: Option<Polygon>,
}

impl Plot {
    pub fn new(kind: PlotKind) -> Self {
        Self {
            kind,
            angles: Vec::new(),
            lengths: Vec::new(),
            pressures: Vec::new(),
            rotation: 0.0,
            total_length: 0.0,
            origin: None,
            cursor: Cell::new(Cursor::default()),
            polygon: None,
        }
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn pressures(&self) -> &[f32] {
        &self.pressures
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Start point recorded by builders (splines, strokes); when set it
    /// overrides the position a plot is drawn at.
    pub fn origin(&self) -> Option<Point2> {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point2) {
        self.origin = Some(origin);
    }

    /// Polygon produced by the last `to_polygon` call.
    pub fn polygon(&self) -> Option<&Polygon> {
        self.polygon.as_ref()
    }

    /// Appends a segment. `in_degrees = false` reads `angle` as radians.
    pub fn add_segment(&mut self, angle: f32, length: f32, pressure: f32, in_degrees: bool) {
        self.angles.pop();
        let angle = to_plot_degrees(angle, in_degrees);
        self.angles.push(angle);
        self.pressures.push(pressure);
        self.lengths.push(length);
        self.total_length = self.lengths.iter().sum();
        // Open trailing angle, fixed by the next segment or end_plot
        self.angles.push(angle);
        self.polygon = None;
    }

    /// Fixes the trailing angle and adds the final pressure.
    pub fn end_plot(&mut self, angle: f32, pressure: f32, in_degrees: bool) {
        self.angles.pop();
        self.angles.push(to_plot_degrees(angle, in_degrees));
        self.pressures.push(pressure);
        self.polygon = None;
    }

    /// Rotation offset added to every angle read from the plot.
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Tangent angle at distance `d`. Beyond the end this is the final angle.
    pub fn angle_at(&self, d: f32) -> f32 {
        let Some(&last) = self.angles.last() else {
            return self.rotation;
        };
        if d > self.total_length {
            return last + self.rotation;
        }
        let (index, start) = self.segment_index(d);
        match self.kind {
            PlotKind::Curved => self.interpolate(&self.angles, index, start, d, true) + self.rotation,
            PlotKind::Straight => self.angles[index] + self.rotation,
        }
    }

    /// Pressure multiplier at distance `d`, clamped to the final value past
    /// the end.
    pub fn pressure_at(&self, d: f32) -> f32 {
        let Some(&last) = self.pressures.last() else {
            return 1.0;
        };
        if d > self.total_length {
            return last;
        }
        let (index, start) = self.segment_index(d);
        self.interpolate(&self.pressures, index, start, d, false)
    }

    /// Segment containing `d`, with the cumulative length where it starts.
    pub fn segment_index(&self, d: f32) -> (usize, f32) {
        if self.lengths.is_empty() {
            return (0, 0.0);
        }
        let mut cursor = self.cursor.get();
        if d < cursor.start || cursor.index >= self.lengths.len() {
            cursor = Cursor::default();
        }
        while cursor.index + 1 < self.lengths.len() && cursor.start + self.lengths[cursor.index] <= d {
            cursor.start += self.lengths[cursor.index];
            cursor.index += 1;
        }
        self.cursor.set(cursor);
        (cursor.index, cursor.start)
    }

    fn interpolate(&self, values: &[f32], index: usize, start: f32, d: f32, wrap: bool) -> f32 {
        let Some(&first) = values.get(index) else {
            return values.last().copied().unwrap_or(0.0);
        };
        let mut m0 = first;
        let mut m1 = values.get(index + 1).copied().unwrap_or(m0);
        // Take the short way round between e.g. 350 and 10
        if wrap && (m1 - m0).abs() > 180.0 {
            if m1 > m0 {
                m1 = -(360.0 - m1);
            } else {
                m0 = -(360.0 - m0);
            }
        }
        let length = self.lengths[index];
        if length <= 0.0 {
            return m1;
        }
        map(d - start, 0.0, length, m0, m1, true)
    }

    /// Approximates the plot with a polygon by walking it from (x, y).
    ///
    /// A vertex is kept whenever the walk enters a new segment, or when the
    /// distance since the last vertex exceeds `segment length * side`
    /// (jittered). Small `side` values give dense, faithful outlines; larger
    /// ones give the coarse, organic outlines used for watercolor fills.
    pub fn to_polygon(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        side: f32,
        field: &FieldView<'_>,
        rand: &mut Rand,
    ) -> Polygon {
        let steps = (self.total_length * scale / POLYGON_STEP).round() as usize;
        let mut position = Position::new(x, y, field);
        let mut vertices = Vec::new();
        let mut since_vertex = 0.0;
        let mut next_index = 0;

        for _ in 0..steps {
            position.plot_to(field, self, POLYGON_STEP, POLYGON_STEP, scale);
            let (index, _) = self.segment_index(position.plotted);
            since_vertex += POLYGON_STEP;

            let threshold = self.lengths[index] * side * rand.random(0.7, 1.3);
            let new_segment = index >= next_index;
            if since_vertex >= threshold || new_segment {
                vertices.push(pt2(position.x, position.y));
                since_vertex = 0.0;
                if new_segment {
                    next_index += 1;
                }
            }
        }

        let polygon = Polygon::new(vertices);
        self.polygon = Some(polygon.clone());
        polygon
    }
}

fn to_plot_degrees(angle: f32, in_degrees: bool) -> f32 {
    if in_degrees {
        normalize_degrees(angle)
    } else {
        normalize_degrees(angle.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldLayout;

    fn two_segment(kind: PlotKind) -> Plot {
        let mut plot = Plot::new(kind);
        plot.add_segment(0.0, 10.0, 1.0, true);
        plot.add_segment(90.0, 10.0, 1.0, true);
        plot.end_plot(90.0, 1.0, true);
        plot
    }

    mod build_tests {
        use super::*;

        #[test]
        fn test_array_lengths_while_building() {
            let mut plot = Plot::new(PlotKind::Curved);
            plot.add_segment(10.0, 5.0, 0.5, true);
            assert_eq!(plot.angles().len(), plot.lengths().len() + 1);
            assert_eq!(plot.pressures().len(), plot.lengths().len());
            plot.add_segment(20.0, 5.0, 0.5, true);
            plot.end_plot(30.0, 1.0, true);
            assert_eq!(plot.angles(), &[10.0, 20.0, 30.0]);
            assert_eq!(plot.pressures().len(), plot.lengths().len() + 1);
            assert!((plot.total_length() - 10.0).abs() < 1e-6);
        }

        #[test]
        fn test_angles_are_normalized() {
            let mut plot = Plot::new(PlotKind::Straight);
            plot.add_segment(-90.0, 5.0, 1.0, true);
            plot.end_plot(std::f32::consts::PI, 1.0, false);
            assert!((plot.angles()[0] - 270.0).abs() < 1e-4);
            assert!((plot.angles()[1] - 180.0).abs() < 1e-3);
        }
    }

    mod interpolation_tests {
        use super::*;

        #[test]
        fn test_curved_midpoint_interpolation() {
            let plot = two_segment(PlotKind::Curved);
            assert!((plot.angle_at(5.0) - 45.0).abs() < 1e-4);
            assert!((plot.angle_at(15.0) - 90.0).abs() < 1e-4);
        }

        #[test]
        fn test_straight_holds_segment_angle() {
            let plot = two_segment(PlotKind::Straight);
            assert_eq!(plot.angle_at(5.0), 0.0);
            assert_eq!(plot.angle_at(12.0), 90.0);
        }

        #[test]
        fn test_clamps_beyond_end() {
            let mut plot = Plot::new(PlotKind::Curved);
            plot.add_segment(0.0, 10.0, 0.2, true);
            plot.end_plot(40.0, 0.8, true);
            for d in [10.5, 25.0, 1000.0] {
                assert!((plot.angle_at(d) - 40.0).abs() < 1e-5);
                assert!((plot.pressure_at(d) - 0.8).abs() < 1e-5);
            }
        }

        #[test]
        fn test_wraparound_takes_short_arc() {
            let mut plot = Plot::new(PlotKind::Curved);
            plot.add_segment(350.0, 10.0, 1.0, true);
            plot.end_plot(10.0, 1.0, true);
            assert!(plot.angle_at(5.0).abs() < 1e-4);
            assert!((normalize_degrees(plot.angle_at(2.5)) - 355.0).abs() < 1e-3);
            assert!((plot.angle_at(7.5) - 5.0).abs() < 1e-3);
        }

        #[test]
        fn test_lookup_after_moving_backwards() {
            let plot = two_segment(PlotKind::Curved);
            assert!((plot.angle_at(15.0) - 90.0).abs() < 1e-4);
            assert!((plot.angle_at(2.5) - 22.5).abs() < 1e-4);
            assert_eq!(plot.segment_index(12.0), (1, 10.0));
        }

        #[test]
        fn test_pressure_interpolates() {
            let mut plot = Plot::new(PlotKind::Straight);
            plot.add_segment(0.0, 10.0, 0.5, true);
            plot.end_plot(0.0, 1.0, true);
            assert!((plot.pressure_at(5.0) - 0.75).abs() < 1e-5);
        }

        #[test]
        fn test_rotation_offsets_angles() {
            let mut plot = two_segment(PlotKind::Straight);
            plot.rotate(30.0);
            assert_eq!(plot.angle_at(1.0), 30.0);
            assert_eq!(plot.angle_at(100.0), 120.0);
        }
    }

    mod polygon_tests {
        use super::*;

        #[test]
        fn test_square_plot_polygon_follows_the_path() {
            let layout = FieldLayout::for_canvas(200.0, 200.0);
            let view = FieldView { layout: &layout, grid: None, translation: Vec2::ZERO };
            let mut rand = Rand::seeded(2);

            let mut plot = Plot::new(PlotKind::Straight);
            for angle in [0.0, 270.0, 180.0, 90.0] {
                plot.add_segment(angle, 40.0, 1.0, true);
            }
            plot.end_plot(90.0, 1.0, true);

            let polygon = plot.to_polygon(50.0, 50.0, 1.0, 0.15, &view, &mut rand);
            assert!(polygon.len() >= 4);
            let (lo, hi) = polygon.bounds().unwrap();
            assert!(lo.x >= 49.0 && lo.y >= 49.0);
            assert!(hi.x <= 91.0 && hi.y <= 91.0);
            assert_eq!(plot.polygon(), Some(&polygon));
        }
    }
}
