// src/field/mod.rs
// Flow fields: grids of angles that steer strokes across the canvas

pub mod flow_field;
pub mod generators;

pub use flow_field::{FieldEnv, FieldGenerator, FieldGrid, FieldLayout, FieldView, FlowField};
pub use generators::standard_fields;
