// src/models/mod.rs
// Plain value types shared across the engine

pub mod color;
pub mod polygon;

pub use color::{Color, ColorError};
pub use polygon::Polygon;
