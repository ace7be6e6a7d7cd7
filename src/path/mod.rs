// src/path/mod.rs
// Paths: the moving Position, parametric Plots and the spline builder

pub mod plot;
pub mod position;
pub mod spline;

pub use plot::{Plot, PlotKind};
pub use position::Position;
pub use spline::{create_spline, SplinePoint};
