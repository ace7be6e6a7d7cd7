// src/painter/mod.rs

pub mod context;
pub mod painter;
pub mod shapes;

pub use context::{DrawContext, EraseState, HatchBrush, HatchState, StrokeState};
pub use painter::Painter;
pub use shapes::RectMode;
