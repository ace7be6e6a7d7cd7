// src/brush/brush_spec.rs
//
// Loose brush description as found in catalog files, validated into a
// Brush. Closures (custom tip geometry, custom pressure) cannot come from
// JSON, so they are attached in code with the `with_*` helpers.

use serde::Deserialize;
use thiserror::Error;

use super::brush_model::{Brush, PressureCurve, PressureSpec, RotationMode};
use super::tips::{CustomTip, ImageTip, MarkerTip, PencilTip, SprayTip, Tip, TipGeometry, TipKind};

#[derive(Debug, Error, PartialEq)]
pub enum BrushError {
    #[error("brush name must not be empty")]
    EmptyName,
    #[error("brush `{brush}` is missing `{field}`, required by {kind:?} tips")]
    MissingField {
        brush: String,
        field: &'static str,
        kind: TipKind,
    },
    #[error("brush `{brush}` has an invalid {field}: {value}")]
    InvalidValue {
        brush: String,
        field: &'static str,
        value: f32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PressureDef {
    #[serde(default)]
    pub curve: Option<[f32; 2]>,
    pub min_max: [f32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    pub src: String,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrushSpec {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub weight: Option<f32>,
    pub vibration: Option<f32>,
    pub definition: Option<f32>,
    pub quality: Option<f32>,
    pub opacity: Option<f32>,
    pub spacing: Option<f32>,
    pub blend: Option<bool>,
    pub pressure: Option<PressureDef>,
    pub rotate: Option<String>,
    pub image: Option<ImageRef>,
    #[serde(skip)]
    pub tip: Option<TipGeometry>,
    #[serde(skip)]
    pub pressure_curve: Option<PressureCurve>,
}

impl BrushSpec {
    pub fn with_tip(mut self, geometry: TipGeometry) -> Self {
        self.tip = Some(geometry);
        self
    }

    pub fn with_pressure_curve(mut self, curve: PressureCurve) -> Self {
        self.pressure_curve = Some(curve);
        self
    }

    fn tip_kind(&self, name: &str) -> TipKind {
        match self.kind.as_deref() {
            None => TipKind::Pencil,
            Some(raw) => {
                let kind = TipKind::parse(raw);
                if kind == TipKind::Pencil && !matches!(raw.trim(), "pencil" | "default") {
                    log::warn!("brush `{}`: unknown tip type `{}`, using pencil", name, raw);
                }
                kind
            }
        }
    }

    /// Checks the fields the tip kind needs and builds the brush.
    pub fn build(self, name: &str) -> Result<Brush, BrushError> {
        if name.trim().is_empty() {
            return Err(BrushError::EmptyName);
        }
        let kind = self.tip_kind(name);
        let missing = |field: &'static str| BrushError::MissingField {
            brush: name.to_string(),
            field,
            kind,
        };
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(BrushError::InvalidValue {
                    brush: name.to_string(),
                    field,
                    value,
                })
            }
        };
        let non_negative = |field: &'static str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(BrushError::InvalidValue {
                    brush: name.to_string(),
                    field,
                    value,
                })
            }
        };

        let weight = positive("weight", self.weight.ok_or_else(|| missing("weight"))?)?;
        let opacity = non_negative("opacity", self.opacity.ok_or_else(|| missing("opacity"))?)?;
        let spacing = positive("spacing", self.spacing.ok_or_else(|| missing("spacing"))?)?;
        let vibration = non_negative("vibration", self.vibration.unwrap_or(0.0))?;

        let tip = match kind {
            TipKind::Pencil => Tip::Pencil(PencilTip {
                definition: non_negative("definition", self.definition.ok_or_else(|| missing("definition"))?)?,
                quality: positive("quality", self.quality.ok_or_else(|| missing("quality"))?)?,
            }),
            TipKind::Spray => Tip::Spray(SprayTip {
                quality: positive("quality", self.quality.ok_or_else(|| missing("quality"))?)?,
            }),
            TipKind::Marker => Tip::Marker(MarkerTip),
            TipKind::Custom => Tip::Custom(CustomTip {
                geometry: self.tip.clone().ok_or_else(|| missing("tip"))?,
            }),
            TipKind::Image => Tip::Image(ImageTip {
                source: self.image.as_ref().map(|i| i.src.clone()).ok_or_else(|| missing("image"))?,
            }),
        };

        let (min, max) = match &self.pressure {
            Some(def) => (def.min_max[0], def.min_max[1]),
            None => (1.0, 1.0),
        };
        let pressure = match self.pressure_curve {
            Some(curve) => PressureSpec::Custom { curve, min, max },
            None => PressureSpec::Gaussian {
                curve: self
                    .pressure
                    .as_ref()
                    .and_then(|def| def.curve)
                    .unwrap_or([0.15, 0.2]),
                min,
                max,
            },
        };

        let blend = match self.blend {
            Some(flag) => flag,
            None => kind.blends_by_default(),
        };

        Ok(Brush {
            name: name.to_string(),
            tip,
            weight,
            vibration,
            opacity,
            spacing,
            pressure,
            blend,
            rotation: self.rotate.as_deref().map(RotationMode::parse).unwrap_or_default(),
        })
    }
}
