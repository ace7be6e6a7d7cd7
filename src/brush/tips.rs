// src/brush/tips.rs
//
// Tip renderers: what a single stamp of each brush kind puts on the mask.
// The stroke renderer positions the stamp, sets the layer fill to the
// stamp color and alpha, then hands over to the brush's renderer.

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

use super::brush_model::{Brush, RotationMode};
use super::tip_images::TipImages;
use crate::render::Layer;
use crate::utilities::Rand;

/// Geometry callback for custom tips. It draws into a layer already
/// translated, scaled and rotated for the stamp, in a unit-sized frame.
pub type TipGeometry = Arc<dyn Fn(&mut Layer<'_>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipKind {
    #[serde(alias = "default")]
    Pencil,
    Spray,
    Marker,
    Custom,
    Image,
}

impl TipKind {
    /// Unknown names fall back to the pencil tip.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "spray" => TipKind::Spray,
            "marker" => TipKind::Marker,
            "custom" => TipKind::Custom,
            "image" => TipKind::Image,
            _ => TipKind::Pencil,
        }
    }

    /// Kinds that mix through the compositor unless told otherwise.
    pub fn blends_by_default(self) -> bool {
        matches!(self, TipKind::Marker | TipKind::Custom | TipKind::Image)
    }
}

/// Everything a tip needs to place one stamp.
pub struct StampContext<'a, 'l> {
    pub layer: &'a mut Layer<'l>,
    pub rand: &'a mut Rand,
    pub images: &'a TipImages,
    pub x: f32,
    pub y: f32,
    /// Stroke weight multiplier set with `stroke_weight`.
    pub weight: f32,
    /// Rotation for natural tips: path tangent plus field angle.
    pub heading: f32,
    /// Pencil texture envelope along the stroke.
    pub envelope: f32,
    /// Preview stamps are placed without jitter.
    pub vibrate: bool,
}

impl StampContext<'_, '_> {
    fn jitter(&mut self, brush: &Brush) -> (f32, f32) {
        if !self.vibrate {
            return (0.0, 0.0);
        }
        let vibration = self.weight * brush.vibration;
        (
            vibration * self.rand.random(-1.0, 1.0),
            vibration * self.rand.random(-1.0, 1.0),
        )
    }
}

pub trait TipRenderer: fmt::Debug + Send + Sync {
    fn stamp(&self, brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32);

    /// Tips that lay a faint preview at both ends of blended strokes.
    fn has_preview(&self) -> bool {
        false
    }
}

/// Grainy graphite: intermittent dots scattered by a texture envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PencilTip {
    pub definition: f32,
    pub quality: f32,
}

impl TipRenderer for PencilTip {
    fn stamp(&self, brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32) {
        if pressure <= 0.0 {
            return;
        }
        let grain = ctx.rand.gaussian(0.0, 1.0);
        let vibration = ctx.weight
            * brush.vibration
            * (self.definition + (1.0 - self.definition) * grain * ctx.envelope / pressure);
        if ctx.rand.random(0.0, self.quality * pressure) > 0.4 {
            let x = ctx.x + 0.7 * vibration * ctx.rand.random(-1.0, 1.0);
            let y = ctx.y + vibration * ctx.rand.random(-1.0, 1.0);
            let d = ctx.weight * brush.weight * pressure * ctx.rand.random(0.85, 1.15);
            ctx.layer.circle(x, y, d);
        }
    }
}

/// Cloud of small dots inside an ellipse that widens with pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprayTip {
    pub quality: f32,
}

impl TipRenderer for SprayTip {
    fn stamp(&self, brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32) {
        if pressure <= 0.0 {
            return;
        }
        let vibration = ctx.weight * brush.vibration * pressure
            + ctx.weight * ctx.rand.gaussian(0.0, 1.0) * brush.vibration / 3.0;
        let dot = brush.weight * ctx.rand.random(0.9, 1.1);
        let count = (self.quality / pressure).ceil().max(0.0) as usize;
        for _ in 0..count {
            let r = ctx.rand.random(0.9, 1.1) * vibration;
            let rx = r * ctx.rand.random(-1.0, 1.0);
            let ry = ctx.rand.random(-1.0, 1.0) * (r * r - rx * rx).max(0.0).sqrt();
            ctx.layer.circle(ctx.x + rx, ctx.y + ry, dot);
        }
    }
}

/// One soft disc per stamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarkerTip;

impl TipRenderer for MarkerTip {
    fn stamp(&self, brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32) {
        let (rx, ry) = ctx.jitter(brush);
        let d = ctx.weight * brush.weight * pressure;
        ctx.layer.circle(ctx.x + rx, ctx.y + ry, d);
    }

    fn has_preview(&self) -> bool {
        true
    }
}

fn orient(brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32) {
    let (rx, ry) = ctx.jitter(brush);
    ctx.layer.translate(ctx.x + rx, ctx.y + ry);
    ctx.layer.scale(ctx.weight * pressure);
    match brush.rotation {
        RotationMode::None => {}
        RotationMode::Random => {
            let angle = ctx.rand.rand_int(0, 360) as f32;
            ctx.layer.rotate(angle);
        }
        RotationMode::Natural => ctx.layer.rotate(ctx.heading),
    }
}

/// User geometry drawn in the stamp frame.
#[derive(Clone)]
pub struct CustomTip {
    pub geometry: TipGeometry,
}

impl fmt::Debug for CustomTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomTip")
    }
}

impl TipRenderer for CustomTip {
    fn stamp(&self, brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32) {
        ctx.layer.push();
        orient(brush, ctx, pressure);
        (self.geometry)(ctx.layer);
        ctx.layer.pop();
    }

    fn has_preview(&self) -> bool {
        true
    }
}

/// A preloaded image, tinted by the stamp color, `brush.weight` wide.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTip {
    pub source: String,
}

impl TipRenderer for ImageTip {
    fn stamp(&self, brush: &Brush, ctx: &mut StampContext<'_, '_>, pressure: f32) {
        let Some(image) = ctx.images.get(&self.source) else {
            return;
        };
        ctx.layer.push();
        orient(brush, ctx, pressure);
        let size = brush.weight;
        ctx.layer.image(image, -size / 2.0, -size / 2.0, size, size);
        ctx.layer.pop();
    }

    fn has_preview(&self) -> bool {
        true
    }
}

/// Tip of a brush, tagged by kind with the fields that kind requires.
#[derive(Debug, Clone)]
pub enum Tip {
    Pencil(PencilTip),
    Spray(SprayTip),
    Marker(MarkerTip),
    Custom(CustomTip),
    Image(ImageTip),
}

impl Tip {
    pub fn kind(&self) -> TipKind {
        match self {
            Tip::Pencil(_) => TipKind::Pencil,
            Tip::Spray(_) => TipKind::Spray,
            Tip::Marker(_) => TipKind::Marker,
            Tip::Custom(_) => TipKind::Custom,
            Tip::Image(_) => TipKind::Image,
        }
    }

    pub fn renderer(&self) -> &dyn TipRenderer {
        match self {
            Tip::Pencil(tip) => tip,
            Tip::Spray(tip) => tip,
            Tip::Marker(tip) => tip,
            Tip::Custom(tip) => tip,
            Tip::Image(tip) => tip,
        }
    }

    pub fn image_source(&self) -> Option<&str> {
        match self {
            Tip::Image(tip) => Some(tip.source.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::brush_model::PressureSpec;
    use crate::models::Color;
    use crate::render::Raster;

    fn brush(tip: Tip) -> Brush {
        Brush {
            name: "test".into(),
            tip,
            weight: 4.0,
            vibration: 0.0,
            opacity: 255.0,
            spacing: 1.0,
            pressure: PressureSpec::Gaussian {
                curve: [0.0, 0.0],
                min: 1.0,
                max: 1.0,
            },
            blend: false,
            rotation: RotationMode::None,
        }
    }

    fn stamp_once(brush: &Brush, raster: &mut Raster, images: &TipImages) {
        let mut rand = Rand::seeded(3);
        let mut layer = Layer::new(raster);
        layer.fill(Color::BLACK);
        let mut ctx = StampContext {
            layer: &mut layer,
            rand: &mut rand,
            images,
            x: 10.0,
            y: 10.0,
            weight: 1.0,
            heading: 0.0,
            envelope: 1.0,
            vibrate: true,
        };
        brush.tip.renderer().stamp(brush, &mut ctx, 1.0);
    }

    #[test]
    fn test_unknown_kind_is_pencil() {
        assert_eq!(TipKind::parse("watercolor"), TipKind::Pencil);
        assert_eq!(TipKind::parse("Marker"), TipKind::Marker);
        assert!(TipKind::Image.blends_by_default());
        assert!(!TipKind::Spray.blends_by_default());
    }

    #[test]
    fn test_marker_stamps_a_disc_of_brush_weight() {
        let mut raster = Raster::new(20, 20).unwrap();
        stamp_once(&brush(Tip::Marker(MarkerTip)), &mut raster, &TipImages::default());
        assert_eq!(raster.alpha(10, 10), 1.0);
        assert_eq!(raster.alpha(10, 14), 0.0);
    }

    #[test]
    fn test_custom_geometry_runs_in_stamp_frame() {
        let geometry: TipGeometry = Arc::new(|layer: &mut Layer<'_>| layer.rect(-1.0, -1.0, 2.0, 2.0));
        let mut b = brush(Tip::Custom(CustomTip { geometry }));
        b.weight = 1.0;
        let mut raster = Raster::new(20, 20).unwrap();
        stamp_once(&b, &mut raster, &TipImages::default());
        assert_eq!(raster.alpha(9, 9), 1.0);
        assert_eq!(raster.alpha(12, 12), 0.0);
    }

    #[test]
    fn test_missing_image_stamps_nothing() {
        let b = brush(Tip::Image(ImageTip { source: "missing.png".into() }));
        let mut raster = Raster::new(20, 20).unwrap();
        stamp_once(&b, &mut raster, &TipImages::default());
        assert!(raster.is_blank());
    }

    #[test]
    fn test_spray_scatters_dots() {
        let mut b = brush(Tip::Spray(SprayTip { quality: 20.0 }));
        b.weight = 1.0;
        b.vibration = 8.0;
        let mut raster = Raster::new(20, 20).unwrap();
        stamp_once(&b, &mut raster, &TipImages::default());
        let covered = raster.pixels().iter().filter(|p| p.alpha() > 0).count();
        assert!(covered > 1);
    }
}
