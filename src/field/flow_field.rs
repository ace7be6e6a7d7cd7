// src/field/flow_field.rs
//
// The flow field registry: a grid layout derived from the canvas size and a
// set of named generators, each holding its last generated grid.

use nannou::prelude::*;
use std::sync::Arc;

use crate::utilities::{Noise, Rand};

/// Geometry of the field grid. The grid spans twice the canvas extent,
/// centred on the canvas, so strokes that wander off-canvas keep a valid
/// lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    pub resolution: f32,
    pub left_x: f32,
    pub top_y: f32,
    pub columns: usize,
    pub rows: usize,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl FieldLayout {
    pub fn for_canvas(width: f32, height: f32) -> Self {
        let resolution = (width.max(height) * 0.01).max(f32::EPSILON);
        Self {
            resolution,
            left_x: -width / 2.0,
            top_y: -height / 2.0,
            columns: (2.0 * width / resolution).round() as usize,
            rows: (2.0 * height / resolution).round() as usize,
            canvas_width: width,
            canvas_height: height,
        }
    }

    pub fn empty_grid(&self) -> FieldGrid {
        FieldGrid::new(self.columns, self.rows)
    }
}

/// Column-major grid of angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Vec<f32>>,
}

impl FieldGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![vec![0.0; rows]; columns],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Angle at a cell; anything outside the grid reads as 0.
    pub fn angle_at(&self, column: i64, row: i64) -> f32 {
        if column < 0 || row < 0 {
            return 0.0;
        }
        self.cells
            .get(column as usize)
            .and_then(|c| c.get(row as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, column: usize, row: usize, angle: f32) {
        if let Some(cell) = self.cells.get_mut(column).and_then(|c| c.get_mut(row)) {
            *cell = angle;
        }
    }

    pub fn columns_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.cells
    }
}

/// Randomness and noise handed to a generator while it fills a grid.
pub struct FieldEnv<'a> {
    pub rand: &'a mut Rand,
    pub noise: &'a Noise,
}

/// `(time, empty grid, env) -> filled grid`
pub type FieldGenerator = Arc<dyn Fn(f32, FieldGrid, &mut FieldEnv<'_>) -> FieldGrid + Send + Sync>;

struct FieldEntry {
    name: String,
    generator: FieldGenerator,
    grid: FieldGrid,
}

pub struct FlowField {
    layout: FieldLayout,
    entries: Vec<FieldEntry>,
    current: Option<String>,
}

impl FlowField {
    pub fn new(layout: FieldLayout) -> Self {
        Self {
            layout,
            entries: Vec::new(),
            current: None,
        }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Registers (or replaces) a field, generates it at t = 0 and makes it
    /// the current field for refreshes.
    pub fn add_field(&mut self, name: &str, generator: FieldGenerator, env: &mut FieldEnv<'_>) {
        let grid = generator(0.0, self.layout.empty_grid(), env);
        log::debug!("field `{}` generated ({}x{})", name, grid.columns(), grid.rows());

        let entry = FieldEntry {
            name: name.to_string(),
            generator,
            grid,
        };
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.current = Some(name.to_string());
    }

    /// Makes `name` the current field. Unknown names leave the selection
    /// untouched and return false.
    pub fn select(&mut self, name: &str) -> bool {
        if self.entries.iter().any(|e| e.name == name) {
            self.current = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Regenerates the current field wholesale for time `t`.
    pub fn refresh(&mut self, t: f32, env: &mut FieldEnv<'_>) {
        let Some(current) = self.current.as_deref() else {
            return;
        };
        let empty = self.layout.empty_grid();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == current) {
            entry.grid = (entry.generator)(t, empty, env);
        }
    }

    pub fn grid(&self, name: &str) -> Option<&FieldGrid> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.grid)
    }

    pub fn list_fields(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Read-only view used by positions. `active` is the field selected in
    /// the draw context; None means no field steers movement.
    pub fn view<'a>(&'a self, active: Option<&str>, translation: Vec2) -> FieldView<'a> {
        FieldView {
            layout: &self.layout,
            grid: active.and_then(|name| self.grid(name)),
            translation,
        }
    }
}

/// What a Position needs to know about the field and canvas while it moves.
#[derive(Clone, Copy)]
pub struct FieldView<'a> {
    pub layout: &'a FieldLayout,
    pub grid: Option<&'a FieldGrid>,
    pub translation: Vec2,
}

impl<'a> FieldView<'a> {
    pub fn is_active(&self) -> bool {
        self.grid.is_some()
    }

    /// Grid cell under a point, including the context translation.
    pub fn cell_of(&self, x: f32, y: f32) -> (i64, i64) {
        let x_offset = x - self.layout.left_x + self.translation.x;
        let y_offset = y - self.layout.top_y + self.translation.y;
        (
            (x_offset / self.layout.resolution).round() as i64,
            (y_offset / self.layout.resolution).round() as i64,
        )
    }

    pub fn contains_cell(&self, column: i64, row: i64) -> bool {
        column >= 0
            && row >= 0
            && (column as usize) < self.layout.columns
            && (row as usize) < self.layout.rows
    }

    /// Canvas padded by half its size on every side.
    pub fn in_canvas(&self, x: f32, y: f32) -> bool {
        let (w, h) = (self.layout.canvas_width, self.layout.canvas_height);
        let (tx, ty) = (self.translation.x, self.translation.y);
        x >= -w / 2.0 - tx && x <= 1.5 * w - tx && y >= -h / 2.0 - ty && y <= 1.5 * h - ty
    }

    pub fn angle_at(&self, column: i64, row: i64) -> f32 {
        self.grid.map_or(0.0, |g| g.angle_at(column, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(angle: f32) -> FieldGenerator {
        Arc::new(move |_t: f32, mut grid: FieldGrid, _env: &mut FieldEnv<'_>| {
            for column in grid.columns_mut() {
                column.iter_mut().for_each(|cell| *cell = angle);
            }
            grid
        })
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_layout_spans_twice_the_canvas() {
            let layout = FieldLayout::for_canvas(400.0, 200.0);
            assert!((layout.resolution - 4.0).abs() < 1e-6);
            assert_eq!(layout.columns, 200);
            assert_eq!(layout.rows, 100);
            assert_eq!(layout.left_x, -200.0);
            assert_eq!(layout.top_y, -100.0);
        }

        #[test]
        fn test_out_of_range_lookup_is_neutral() {
            let mut grid = FieldGrid::new(3, 3);
            grid.set(1, 1, 45.0);
            assert_eq!(grid.angle_at(1, 1), 45.0);
            assert_eq!(grid.angle_at(-1, 0), 0.0);
            assert_eq!(grid.angle_at(3, 0), 0.0);
            assert_eq!(grid.angle_at(0, 99), 0.0);
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_add_select_refresh() {
            let mut rand = Rand::seeded(1);
            let noise = Noise::seeded(1);
            let mut env = FieldEnv {
                rand: &mut rand,
                noise: &noise,
            };
            let mut field = FlowField::new(FieldLayout::for_canvas(100.0, 100.0));

            field.add_field("flat", constant(0.0), &mut env);
            field.add_field("tilted", constant(30.0), &mut env);
            assert_eq!(field.current(), Some("tilted"));
            assert_eq!(field.list_fields(), vec!["flat", "tilted"]);

            assert!(field.select("flat"));
            assert!(!field.select("missing"));
            assert_eq!(field.current(), Some("flat"));

            let timed: FieldGenerator = Arc::new(|t: f32, mut grid: FieldGrid, _env: &mut FieldEnv<'_>| {
                grid.set(0, 0, t);
                grid
            });
            field.add_field("timed", timed, &mut env);
            field.refresh(12.0, &mut env);
            assert_eq!(field.grid("timed").unwrap().angle_at(0, 0), 12.0);
        }

        #[test]
        fn test_view_uses_translation_for_cells() {
            let field = FlowField::new(FieldLayout::for_canvas(100.0, 100.0));
            let plain = field.view(None, Vec2::ZERO);
            let shifted = field.view(None, vec2(10.0, 0.0));
            let (c0, r0) = plain.cell_of(0.0, 0.0);
            let (c1, r1) = shifted.cell_of(0.0, 0.0);
            assert_eq!((c0, r0), (50, 50));
            assert_eq!((c1, r1), (60, 50));
            assert!(!plain.is_active());
            assert_eq!(plain.angle_at(c0, r0), 0.0);
        }
    }
}
