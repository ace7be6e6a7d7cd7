// src/brush/mod.rs

pub mod brush_model;
pub mod brush_spec;
pub mod catalog;
pub mod tip_images;
pub mod tips;

pub use brush_model::{Brush, PressureCurve, PressureSpec, RotationMode};
pub use brush_spec::{BrushError, BrushSpec, ImageRef, PressureDef};
pub use catalog::{BrushCatalog, CatalogError};
pub use tip_images::{TipImageError, TipImages};
pub use tips::{StampContext, Tip, TipGeometry, TipKind, TipRenderer};
