// src/lib.rs
//
// brushwork: natural-media mark making on raster canvases. Brushes stamp
// into offscreen masks that are mixed into the canvas as pigment, strokes
// follow flow fields, and polygons get watercolor washes and hatching.

pub mod blend;
pub mod brush;
pub mod config;
pub mod field;
pub mod fill;
pub mod logging;
pub mod models;
pub mod painter;
pub mod path;
pub mod render;
pub mod services;
pub mod stroke;
pub mod utilities;

pub use models::{Color, Polygon};
pub use painter::{Painter, RectMode};
pub use render::{Canvas, Raster};
