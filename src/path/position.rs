// src/path/position.rs
//
// A moving point that integrates motion through the flow field while
// keeping its own distance counter. Every stroke and polygon walk owns one.

use crate::field::FieldView;
use crate::path::Plot;
use crate::utilities::{cos_deg, sin_deg};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    /// Distance travelled along the path, advanced even while off-field.
    pub plotted: f32,
    column: i64,
    row: i64,
}

impl Position {
    pub fn new(x: f32, y: f32, field: &FieldView<'_>) -> Self {
        let mut position = Self {
            x,
            y,
            plotted: 0.0,
            column: 0,
            row: 0,
        };
        position.update(x, y, field);
        position
    }

    pub fn update(&mut self, x: f32, y: f32, field: &FieldView<'_>) {
        self.x = x;
        self.y = y;
        if field.is_active() {
            let (column, row) = field.cell_of(x, y);
            self.column = column;
            self.row = row;
        }
    }

    /// Inside the field grid when a field is active, otherwise inside the
    /// padded canvas.
    pub fn is_in(&self, field: &FieldView<'_>) -> bool {
        if field.is_active() {
            field.contains_cell(self.column, self.row)
        } else {
            field.in_canvas(self.x, self.y)
        }
    }

    /// Field angle under the point, 0 when no field applies.
    pub fn angle(&self, field: &FieldView<'_>) -> f32 {
        if field.is_active() && self.is_in(field) {
            field.angle_at(self.column, self.row)
        } else {
            0.0
        }
    }

    /// Moves `length` in steps of `step` along `bearing`, bent by the field
    /// angle when `follow_field` is set. `plotted` grows by `step` on every
    /// iteration whether or not the point actually moved.
    pub fn move_to(
        &mut self,
        field: &FieldView<'_>,
        length: f32,
        bearing: f32,
        step: f32,
        follow_field: bool,
    ) {
        if step <= 0.0 {
            return;
        }
        let iterations = (length / step).ceil().max(0.0) as usize;
        for _ in 0..iterations {
            if self.is_in(field) {
                let heading = if follow_field {
                    self.angle(field) - bearing
                } else {
                    -bearing
                };
                let (dx, dy) = (step * cos_deg(heading), step * sin_deg(heading));
                self.update(self.x + dx, self.y + dy, field);
            }
            self.plotted += step;
        }
    }

    /// Walks `length` following the tangent of `plot` at the current
    /// plotted distance. `plotted` advances by `step / scale`, so a plot
    /// drawn at scale 2 is read at half the physical rate.
    pub fn plot_to(&mut self, field: &FieldView<'_>, plot: &Plot, length: f32, step: f32, scale: f32) {
        if step <= 0.0 || scale == 0.0 {
            return;
        }
        let inverse_scale = 1.0 / scale;
        let iterations = (length / step).ceil().max(0.0) as usize;
        for _ in 0..iterations {
            if self.is_in(field) {
                let heading = self.angle(field) - plot.angle_at(self.plotted);
                let (dx, dy) = (step * cos_deg(heading), step * sin_deg(heading));
                self.update(self.x + dx, self.y + dy, field);
            }
            self.plotted += step * inverse_scale;
        }
    }
}
