// src/stroke/pressure.rs
//
// Per-stroke pressure profile. The random perturbations are drawn once when
// the stroke begins, so two strokes of the same brush never press alike.

use crate::brush::{PressureCurve, PressureSpec};
use crate::utilities::{map, Rand};

#[derive(Clone)]
enum Shape {
    Gaussian { center: f32, width: f32, exponent: f32 },
    Custom { curve: PressureCurve, offset: f32 },
}

#[derive(Clone)]
pub struct PressureProfile {
    shape: Shape,
    min: f32,
    max: f32,
}

impl PressureProfile {
    /// Samples the per-stroke perturbations for `spec`.
    pub fn begin(spec: &PressureSpec, rand: &mut Rand) -> Self {
        match spec {
            PressureSpec::Gaussian { curve, min, max } => {
                let a = rand.random(-1.0, 1.0);
                let b = rand.random(1.0, 1.5);
                let cp = rand.random(3.0, 3.5);
                Self {
                    shape: Shape::Gaussian {
                        center: 0.5 + curve[0] * a,
                        width: 1.0 - curve[1] * b,
                        exponent: 2.0 * cp,
                    },
                    min: *min,
                    max: *max,
                }
            }
            PressureSpec::Custom { curve, min, max } => Self {
                shape: Shape::Custom {
                    curve: curve.clone(),
                    offset: rand.random(-0.2, 0.2),
                },
                min: *min,
                max: *max,
            },
        }
    }

    /// Pressure after `plotted` units of a stroke `length` long.
    pub fn at(&self, plotted: f32, length: f32) -> f32 {
        match &self.shape {
            Shape::Gaussian { center, width, exponent } => {
                bell(plotted, length, *center, *width, *exponent, self.min, self.max)
            }
            Shape::Custom { curve, offset } => {
                let t = if length > 0.0 { plotted / length } else { 0.0 };
                map(curve(t) + offset, 0.0, 1.0, self.min, self.max, true)
            }
        }
    }
}

/// Generalized bell over a stroke: 1 / (1 + |(d - center·L) / (width·L/2)|^exponent)
/// remapped from [0, 1] to [min, max].
pub fn bell(plotted: f32, length: f32, center: f32, width: f32, exponent: f32, min: f32, max: f32) -> f32 {
    let half = width * length / 2.0;
    let value = if half.abs() <= f32::EPSILON {
        if (plotted - center * length).abs() <= f32::EPSILON {
            1.0
        } else {
            0.0
        }
    } else {
        let u = ((plotted - center * length) / half).abs();
        1.0 / (1.0 + u.powf(exponent))
    };
    map(value, 0.0, 1.0, min, max, false)
}

/// Texture envelope of pencil tips: grain is strongest mid-stroke.
pub fn pencil_envelope(plotted: f32, length: f32) -> f32 {
    bell(plotted, length, 0.5, 0.9, 10.0, 0.2, 1.2)
}
