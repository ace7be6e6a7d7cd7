// src/blend/mod.rs
// Deferred pigment mixing between brush masks and the canvas

pub mod compositor;

pub use compositor::{BlendState, Channel, Compositor, MaskTarget};
