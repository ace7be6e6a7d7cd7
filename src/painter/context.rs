// src/painter/context.rs
//
// The draw context: every setting a primitive reads when it draws. It is a
// plain value, so push/pop are snapshots on a stack.

use crate::fill::{FillState, HatchOptions};
use crate::models::Color;
use crate::render::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeState {
    pub active: bool,
    pub brush: String,
    pub color: Color,
    pub weight: f32,
    /// [x1, y1, x2, y2]
    pub clip: Option<[f32; 4]>,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self {
            active: true,
            brush: "HB".to_string(),
            color: Color::BLACK,
            weight: 1.0,
            clip: None,
        }
    }
}

/// Brush, color and weight hatches are drawn with instead of the stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchBrush {
    pub brush: String,
    pub color: Color,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HatchState {
    pub active: bool,
    pub dist: f32,
    /// Degrees.
    pub angle: f32,
    pub options: HatchOptions,
    pub brush: Option<HatchBrush>,
}

impl Default for HatchState {
    fn default() -> Self {
        Self {
            active: false,
            dist: 5.0,
            angle: 45.0,
            options: HatchOptions::default(),
            brush: None,
        }
    }
}

/// Solid cover painted over shapes in the pass-through mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseState {
    pub active: bool,
    pub color: Color,
    /// 0..255
    pub alpha: f32,
}

impl Default for EraseState {
    fn default() -> Self {
        Self {
            active: false,
            color: Color::WHITE,
            alpha: 255.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawContext {
    pub stroke: StrokeState,
    pub fill: FillState,
    pub hatch: HatchState,
    pub erase: EraseState,
    /// Field steering strokes, None when disabled.
    pub field: Option<String>,
    pub transform: Transform,
}
