// src/stroke/mod.rs

pub mod pressure;
pub mod renderer;

pub use pressure::{bell, pencil_envelope, PressureProfile};
pub use renderer::{draw_stroke, draw_tip, StrokeEnv, StrokePath, StrokeRenderer, StrokeStyle};
