// src/fill/mod.rs
// Polygon fills: watercolor washes and hatching

pub mod fill_polygon;
pub mod hatch;
pub mod watercolor;

pub use fill_polygon::{Bleed, BleedDirection, FillPolygon};
pub use hatch::{hatch_lines, HatchOptions};
pub use watercolor::{seed_polygon, watercolor_fill, FillState};
