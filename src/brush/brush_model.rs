// src/brush/brush_model.rs
//
// Brush definition: a named tip plus the numbers the stroke renderer needs.

use std::fmt;
use std::sync::Arc;

use super::tips::{Tip, TipKind};
use crate::blend::{Channel, MaskTarget};

/// User pressure curve over the normalized stroke length.
pub type PressureCurve = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

#[derive(Clone)]
pub enum PressureSpec {
    /// Bell-shaped pressure whose center and width are perturbed per stroke.
    Gaussian { curve: [f32; 2], min: f32, max: f32 },
    Custom { curve: PressureCurve, min: f32, max: f32 },
}

impl PressureSpec {
    pub fn range(&self) -> (f32, f32) {
        match self {
            PressureSpec::Gaussian { min, max, .. } | PressureSpec::Custom { min, max, .. } => (*min, *max),
        }
    }
}

impl fmt::Debug for PressureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressureSpec::Gaussian { curve, min, max } => f
                .debug_struct("Gaussian")
                .field("curve", curve)
                .field("min", min)
                .field("max", max)
                .finish(),
            PressureSpec::Custom { min, max, .. } => f
                .debug_struct("Custom")
                .field("min", min)
                .field("max", max)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    #[default]
    None,
    Random,
    /// Follows the path tangent and the field.
    Natural,
}

impl RotationMode {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => RotationMode::Random,
            "natural" => RotationMode::Natural,
            _ => RotationMode::None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Brush {
    pub name: String,
    pub tip: Tip,
    pub weight: f32,
    pub vibration: f32,
    /// 0..255
    pub opacity: f32,
    pub spacing: f32,
    pub pressure: PressureSpec,
    pub blend: bool,
    pub rotation: RotationMode,
}

impl Brush {
    pub fn kind(&self) -> TipKind {
        self.tip.kind()
    }

    /// Distance between stamps at stroke weight `w`. Dot tips pack tighter
    /// as the stroke gets heavier.
    pub fn step_for(&self, w: f32) -> f32 {
        match self.kind() {
            TipKind::Pencil | TipKind::Spray if w > 0.0 => self.spacing / w,
            _ => self.spacing,
        }
    }

    /// Exponent applied to pressure when deriving stamp alpha.
    pub fn alpha_exponent(&self) -> f32 {
        match self.kind() {
            TipKind::Marker => 0.7,
            _ => 1.5,
        }
    }

    /// Stamp alpha on the 0..255 scale.
    pub fn alpha(&self, pressure: f32) -> f32 {
        (self.opacity * pressure.max(0.0).powf(self.alpha_exponent())).floor()
    }

    pub fn mask_target(&self) -> MaskTarget {
        match (self.blend, self.kind()) {
            (true, TipKind::Image) => MaskTarget::Blended(Channel::Image),
            (true, _) => MaskTarget::Blended(Channel::Vector),
            (false, _) => MaskTarget::PassThrough,
        }
    }

    /// Copy with its size-like parameters multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Brush {
        Brush {
            weight: self.weight * factor,
            vibration: self.vibration * factor,
            spacing: self.spacing * factor,
            ..self.clone()
        }
    }
}
