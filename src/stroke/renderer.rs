// src/stroke/renderer.rs
//
// Walks a Position along a straight line, a flow line or a Plot at the
// brush spacing and stamps the tip at every step. A stroke runs as
// begin -> (stamp, advance) x steps -> end.

use crate::brush::{Brush, StampContext, TipImages};
use crate::field::FieldView;
use crate::models::Color;
use crate::path::{Plot, Position};
use crate::render::Layer;
use crate::utilities::Rand;

use super::pressure::{pencil_envelope, PressureProfile};

/// Shape of the path a stroke follows.
#[derive(Debug, Clone, Copy)]
pub enum StrokePath<'p> {
    /// `length` units along `direction` (degrees), optionally bent by the
    /// active field.
    Line {
        length: f32,
        direction: f32,
        follow_field: bool,
    },
    /// A plot drawn at `scale`.
    Plot { plot: &'p Plot, scale: f32 },
}

impl StrokePath<'_> {
    /// Length used by the pressure profile.
    pub fn length(&self) -> f32 {
        match self {
            StrokePath::Line { length, .. } => *length,
            StrokePath::Plot { plot, .. } => plot.total_length(),
        }
    }
}

/// Brush, color and weight multiplier a stroke is drawn with.
#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle<'b> {
    pub brush: &'b Brush,
    pub color: Color,
    pub weight: f32,
}

/// Everything a stroke borrows from the painter while it draws.
pub struct StrokeEnv<'a, 'l> {
    /// Mask layer already carrying the context transform.
    pub layer: &'a mut Layer<'l>,
    pub rand: &'a mut Rand,
    pub images: &'a TipImages,
    pub field: FieldView<'a>,
    /// [x1, y1, x2, y2]
    pub clip: Option<[f32; 4]>,
}

impl StrokeEnv<'_, '_> {
    /// Inside the clip rect, or inside the canvas padded by 5% when no clip
    /// rect is set.
    pub fn is_inside(&self, x: f32, y: f32) -> bool {
        match self.clip {
            Some([x1, y1, x2, y2]) => x >= x1 && x <= x2 && y >= y1 && y <= y2,
            None => {
                let (w, h) = (self.field.layout.canvas_width, self.field.layout.canvas_height);
                let t = self.field.translation;
                x >= -0.05 * w - t.x && x <= 1.05 * w - t.x && y >= -0.05 * h - t.y && y <= 1.05 * h - t.y
            }
        }
    }
}

struct Stamp {
    pressure: f32,
    heading: f32,
    envelope: f32,
    vibrate: bool,
    color: Color,
}

fn place(env: &mut StrokeEnv<'_, '_>, style: &StrokeStyle<'_>, x: f32, y: f32, stamp: Stamp) {
    env.layer.fill(stamp.color);
    let brush = style.brush;
    let mut ctx = StampContext {
        layer: &mut *env.layer,
        rand: &mut *env.rand,
        images: env.images,
        x,
        y,
        weight: style.weight,
        heading: stamp.heading,
        envelope: stamp.envelope,
        vibrate: stamp.vibrate,
    };
    brush.tip.renderer().stamp(brush, &mut ctx, stamp.pressure);
}

/// Stamp color for a given alpha on the 0..255 scale. Blended masks only
/// carry coverage, so their stamps are a fixed marker color.
fn stamp_color(style: &StrokeStyle<'_>, alpha: f32) -> Color {
    let a = (alpha / 255.0).clamp(0.0, 1.0);
    if style.brush.blend {
        Color::rgb(1.0, 0.0, 0.0).with_alpha(a / 2.0)
    } else {
        style.color.with_alpha(a * style.color.a)
    }
}

pub struct StrokeRenderer<'s, 'p> {
    style: StrokeStyle<'s>,
    path: StrokePath<'p>,
    position: Position,
    profile: PressureProfile,
}

impl<'s, 'p> StrokeRenderer<'s, 'p> {
    /// Starts a stroke at (x, y). Blended brushes lay their preview here.
    pub fn begin(
        env: &mut StrokeEnv<'_, '_>,
        style: StrokeStyle<'s>,
        x: f32,
        y: f32,
        path: StrokePath<'p>,
    ) -> Self {
        let profile = PressureProfile::begin(&style.brush.pressure, env.rand);
        let renderer = Self {
            style,
            path,
            position: Position::new(x, y, &env.field),
            profile,
        };
        renderer.preview(env);
        renderer
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn step(&self) -> f32 {
        self.style.brush.step_for(self.style.weight)
    }

    /// Number of stamps the stroke lays.
    pub fn steps(&self) -> usize {
        let step = self.step();
        if step <= 0.0 {
            return 0;
        }
        let length = match self.path {
            StrokePath::Line { length, .. } => length,
            StrokePath::Plot { plot, scale } => plot.total_length() * scale,
        };
        (length / step).round().max(0.0) as usize
    }

    /// Pressure at the current position.
    pub fn pressure(&self) -> f32 {
        let length = self.path.length();
        let simulated = self.profile.at(self.position.plotted, length);
        match self.path {
            StrokePath::Line { .. } => simulated,
            StrokePath::Plot { plot, .. } => simulated * plot.pressure_at(self.position.plotted),
        }
    }

    /// Rotation for natural tips at the current position.
    fn heading(&self, field: &FieldView<'_>) -> f32 {
        match self.path {
            StrokePath::Line {
                direction,
                follow_field,
                ..
            } => {
                let bend = if follow_field { self.position.angle(field) } else { 0.0 };
                bend - direction
            }
            StrokePath::Plot { plot, .. } => self.position.angle(field) - plot.angle_at(self.position.plotted),
        }
    }

    fn envelope(&self) -> f32 {
        pencil_envelope(self.position.plotted, self.path.length())
    }

    /// Lays one stamp. Returns false when the position is clipped.
    pub fn stamp(&mut self, env: &mut StrokeEnv<'_, '_>) -> bool {
        let (x, y) = (self.position.x, self.position.y);
        if !env.is_inside(x, y) {
            return false;
        }
        let pressure = self.pressure();
        let alpha = self.style.brush.alpha(pressure);
        let stamp = Stamp {
            pressure,
            heading: self.heading(&env.field),
            envelope: self.envelope(),
            vibrate: true,
            color: stamp_color(&self.style, alpha),
        };
        place(env, &self.style, x, y, stamp);
        true
    }

    /// Moves one spacing along the path.
    pub fn advance(&mut self, env: &StrokeEnv<'_, '_>) {
        let step = self.step();
        match self.path {
            StrokePath::Line {
                direction,
                follow_field,
                ..
            } => self.position.move_to(&env.field, step, direction, step, follow_field),
            StrokePath::Plot { plot, scale } => self.position.plot_to(&env.field, plot, step, step, scale),
        }
    }

    /// Faint stepped stamps without jitter, laid at both ends of strokes
    /// drawn with blended marker-like brushes.
    fn preview(&self, env: &mut StrokeEnv<'_, '_>) {
        let brush = self.style.brush;
        if !brush.blend || !brush.tip.renderer().has_preview() {
            return;
        }
        let (x, y) = (self.position.x, self.position.y);
        if !env.is_inside(x, y) {
            return;
        }
        let pressure = self.pressure();
        let alpha = brush.alpha(pressure) / 1.5;
        let color = Color::rgb(1.0, 0.0, 0.0).with_alpha((alpha / 255.0).clamp(0.0, 1.0));
        let heading = self.heading(&env.field);
        for s in 1..5 {
            let stamp = Stamp {
                pressure: pressure * s as f32 / 5.0,
                heading,
                envelope: 1.0,
                vibrate: false,
                color,
            };
            place(env, &self.style, x, y, stamp);
        }
    }

    /// Finishes the stroke and returns where it ended.
    pub fn end(self, env: &mut StrokeEnv<'_, '_>) -> Position {
        self.preview(env);
        self.position
    }
}

/// Draws a whole stroke and returns the number of stamps laid.
pub fn draw_stroke(
    env: &mut StrokeEnv<'_, '_>,
    style: StrokeStyle<'_>,
    x: f32,
    y: f32,
    path: StrokePath<'_>,
) -> usize {
    let mut stroke = StrokeRenderer::begin(env, style, x, y, path);
    let mut laid = 0;
    for _ in 0..stroke.steps() {
        if stroke.stamp(env) {
            laid += 1;
        }
        stroke.advance(env);
    }
    stroke.end(env);
    laid
}

/// A single stamp at (x, y) with an explicit pressure.
pub fn draw_tip(env: &mut StrokeEnv<'_, '_>, style: StrokeStyle<'_>, x: f32, y: f32, pressure: f32) {
    if !env.is_inside(x, y) {
        return;
    }
    let alpha = style.brush.alpha(pressure);
    let heading = Position::new(x, y, &env.field).angle(&env.field);
    let stamp = Stamp {
        pressure,
        heading,
        envelope: 1.0,
        vibrate: true,
        color: stamp_color(&style, alpha),
    };
    place(env, &style, x, y, stamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::tips::{MarkerTip, Tip};
    use crate::brush::{PressureSpec, RotationMode};
    use crate::field::FieldLayout;
    use crate::path::PlotKind;
    use crate::render::Raster;
    use nannou::prelude::*;

    fn marker(spacing: f32, blend: bool) -> Brush {
        Brush {
            name: "m".into(),
            tip: Tip::Marker(MarkerTip),
            weight: 2.0,
            vibration: 0.0,
            opacity: 255.0,
            spacing,
            pressure: PressureSpec::Gaussian {
                curve: [0.0, 0.0],
                min: 1.0,
                max: 1.0,
            },
            blend,
            rotation: RotationMode::None,
        }
    }

    fn style(brush: &Brush) -> StrokeStyle<'_> {
        StrokeStyle {
            brush,
            color: Color::BLACK,
            weight: 1.0,
        }
    }

    mod walk_tests {
        use super::*;

        #[test]
        fn test_line_stamps_at_spacing() {
            let layout = FieldLayout::for_canvas(200.0, 200.0);
            let mut raster = Raster::new(200, 200).unwrap();
            let mut layer = Layer::new(&mut raster);
            let mut rand = Rand::seeded(5);
            let images = TipImages::default();
            let mut env = StrokeEnv {
                layer: &mut layer,
                rand: &mut rand,
                images: &images,
                field: FieldView { layout: &layout, grid: None, translation: Vec2::ZERO },
                clip: None,
            };
            let brush = marker(10.0, false);
            let path = StrokePath::Line { length: 100.0, direction: 0.0, follow_field: false };
            let mut stroke = StrokeRenderer::begin(&mut env, style(&brush), 0.0, 0.0, path);

            assert_eq!(stroke.steps(), 10);
            let mut stamps = Vec::new();
            for _ in 0..stroke.steps() {
                stamps.push((stroke.position().x, stroke.position().y));
                assert!(stroke.stamp(&mut env));
                stroke.advance(&env);
            }
            let end = stroke.end(&mut env);
            for (i, (x, y)) in stamps.iter().enumerate() {
                assert!((x - 10.0 * i as f32).abs() < 1e-3, "stamp {} at {}", i, x);
                assert!(y.abs() < 1e-3);
            }
            assert!((end.x - 100.0).abs() < 1e-3);
            assert!((end.plotted - 100.0).abs() < 1e-3);
        }

        #[test]
        fn test_pencil_spacing_shrinks_with_weight() {
            let mut brush = marker(0.5, false);
            brush.tip = Tip::Pencil(crate::brush::tips::PencilTip { definition: 0.5, quality: 8.0 });
            assert!((brush.step_for(2.0) - 0.25).abs() < 1e-6);
        }

        #[test]
        fn test_plot_steps_scale_with_plot() {
            let layout = FieldLayout::for_canvas(200.0, 200.0);
            let mut raster = Raster::new(200, 200).unwrap();
            let mut layer = Layer::new(&mut raster);
            let mut rand = Rand::seeded(5);
            let images = TipImages::default();
            let mut env = StrokeEnv {
                layer: &mut layer,
                rand: &mut rand,
                images: &images,
                field: FieldView { layout: &layout, grid: None, translation: Vec2::ZERO },
                clip: None,
            };
            let mut plot = Plot::new(PlotKind::Straight);
            plot.add_segment(0.0, 20.0, 1.0, true);
            plot.end_plot(0.0, 1.0, true);
            let brush = marker(1.0, false);
            let path = StrokePath::Plot { plot: &plot, scale: 2.0 };
            let laid = draw_stroke(&mut env, style(&brush), 10.0, 10.0, path);
            assert_eq!(laid, 40);
        }
    }

    mod clip_tests {
        use super::*;

        #[test]
        fn test_clip_rect_suppresses_stamps() {
            let layout = FieldLayout::for_canvas(200.0, 200.0);
            let mut raster = Raster::new(200, 200).unwrap();
            let laid = {
                let mut layer = Layer::new(&mut raster);
                let mut rand = Rand::seeded(5);
                let images = TipImages::default();
                let mut env = StrokeEnv {
                    layer: &mut layer,
                    rand: &mut rand,
                    images: &images,
                    field: FieldView { layout: &layout, grid: None, translation: Vec2::ZERO },
                    clip: Some([0.0, 0.0, 50.0, 50.0]),
                };
                let brush = marker(10.0, false);
                let path = StrokePath::Line { length: 100.0, direction: 0.0, follow_field: false };
                draw_stroke(&mut env, style(&brush), 0.0, 20.0, path)
            };
            // x = 0, 10, ..., 50
            assert_eq!(laid, 6);
            assert_eq!(raster.alpha(80, 20), 0.0);
            assert!(raster.alpha(30, 20) > 0.0);
        }

        #[test]
        fn test_default_clip_is_padded_canvas() {
            let layout = FieldLayout::for_canvas(100.0, 100.0);
            let mut raster = Raster::new(10, 10).unwrap();
            let mut layer = Layer::new(&mut raster);
            let mut rand = Rand::seeded(5);
            let images = TipImages::default();
            let env = StrokeEnv {
                layer: &mut layer,
                rand: &mut rand,
                images: &images,
                field: FieldView { layout: &layout, grid: None, translation: Vec2::ZERO },
                clip: None,
            };
            assert!(env.is_inside(-4.0, 104.0));
            assert!(!env.is_inside(-6.0, 50.0));
        }
    }

    mod blend_tests {
        use super::*;

        #[test]
        fn test_blended_stamps_carry_half_alpha() {
            let layout = FieldLayout::for_canvas(50.0, 50.0);
            let mut raster = Raster::new(50, 50).unwrap();
            {
                let mut layer = Layer::new(&mut raster);
                let mut rand = Rand::seeded(5);
                let images = TipImages::default();
                let mut env = StrokeEnv {
                    layer: &mut layer,
                    rand: &mut rand,
                    images: &images,
                    field: FieldView { layout: &layout, grid: None, translation: Vec2::ZERO },
                    clip: None,
                };
                let mut brush = marker(10.0, true);
                brush.weight = 6.0;
                draw_tip(&mut env, style(&brush), 25.0, 25.0, 1.0);
            }
            let a = raster.alpha(25, 25);
            assert!((a - 0.5).abs() < 2.0 / 255.0);
        }
    }
}
