// src/render/mod.rs
// Raster surfaces, the layer cursor brushes draw through, and the canvas
// contract the compositor flushes into

pub mod canvas;
pub mod layer;
pub mod raster;

pub use canvas::{km_mix, Canvas, MixUniforms};
pub use layer::Layer;
pub use raster::{Ink, Raster, RasterError};
pub use tiny_skia::Transform;
