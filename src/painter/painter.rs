// src/painter/painter.rs
//
// The public drawing surface. A Painter owns the destination canvas, the
// compositor masks, the brush catalog, the field registry and the random
// sources, and reads everything else from its DrawContext.

use nannou::prelude::*;
use std::path::Path;

use super::context::{DrawContext, HatchBrush};
use crate::blend::{Channel, Compositor, MaskTarget};
use crate::brush::{Brush, BrushCatalog, BrushError, BrushSpec, CatalogError, TipImageError, TipImages};
use crate::field::{standard_fields, FieldEnv, FieldGenerator, FieldLayout, FlowField};
use crate::fill::{hatch_lines, watercolor_fill, BleedDirection, HatchOptions};
use crate::models::{Color, Polygon};
use crate::path::Plot;
use crate::render::{Canvas, Layer, RasterError};
use crate::stroke::{draw_stroke, draw_tip, StrokeEnv, StrokePath, StrokeStyle};
use crate::utilities::{calculate_angle, dist, Noise, Rand};

pub struct Painter<C: Canvas> {
    pub(super) canvas: C,
    pub(super) compositor: Compositor,
    pub(super) catalog: BrushCatalog,
    pub(super) images: TipImages,
    pub(super) field: FlowField,
    pub(super) noise: Noise,
    pub(super) rand: Rand,
    pub(super) context: DrawContext,
    pub(super) stack: Vec<DrawContext>,
    pub(super) recording: Option<super::shapes::Recording>,
}

impl<C: Canvas> Painter<C> {
    /// Binds a painter to `canvas` with the standard brushes and fields.
    /// Fails when the compositor masks cannot be allocated at the canvas size.
    pub fn load(canvas: C) -> Result<Self, RasterError> {
        let (width, height) = canvas.size();
        let mut rand = Rand::from_entropy();
        let noise = Noise::seeded(rand.rand_int(0, i32::MAX) as u32);
        let mut painter = Self {
            canvas,
            compositor: Compositor::new(width, height)?,
            catalog: BrushCatalog::standard(width as f32),
            images: TipImages::new(),
            field: FlowField::new(FieldLayout::for_canvas(width as f32, height as f32)),
            noise,
            rand,
            context: DrawContext::default(),
            stack: Vec::new(),
            recording: None,
        };
        for (name, generator) in standard_fields() {
            painter.add_field(name, generator);
        }
        log::debug!("painter loaded on a {}x{} canvas", width, height);
        Ok(painter)
    }

    /// Reseeds randomness and noise. Fields keep their grids until
    /// refreshed.
    pub fn seed(&mut self, seed: u64) {
        self.rand.reseed(seed);
        self.noise.reseed(seed as u32);
    }

    pub fn context(&self) -> &DrawContext {
        &self.context
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Flushes pending pigment and hands back the canvas.
    pub fn into_canvas(mut self) -> C {
        self.flush();
        self.canvas
    }

    // Brushes

    pub fn add_brush(&mut self, brush: Brush) {
        if let Some(source) = brush.tip.image_source() {
            self.images.register(source);
        }
        self.catalog.insert(brush);
    }

    pub fn add_brush_spec(&mut self, name: &str, spec: BrushSpec) -> Result<(), BrushError> {
        let brush = spec.build(name)?;
        self.add_brush(brush);
        Ok(())
    }

    /// Adds every brush of a JSON catalog file.
    pub fn load_brushes<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<String>, CatalogError> {
        let names = self.catalog.load_json(path)?;
        for source in self.catalog.image_sources() {
            self.images.register(&source);
        }
        Ok(names)
    }

    /// Decodes the tips of image brushes, relative to `base_dir`.
    pub fn load_tip_images<P: AsRef<Path>>(&mut self, base_dir: P) -> Result<usize, TipImageError> {
        self.images.load_all(base_dir)
    }

    pub fn brushes(&self) -> Vec<&str> {
        self.catalog.names().collect()
    }

    // Stroke state

    /// Selects a brush with color and weight and turns strokes on.
    pub fn set(&mut self, brush: &str, color: Color, weight: f32) {
        self.pick(brush);
        let stroke = &mut self.context.stroke;
        stroke.color = color;
        stroke.weight = weight;
        stroke.active = true;
    }

    pub fn pick(&mut self, brush: &str) {
        if self.catalog.contains(brush) {
            self.context.stroke.brush = brush.to_string();
        } else {
            log::warn!("unknown brush `{}`, keeping `{}`", brush, self.context.stroke.brush);
        }
    }

    pub fn stroke(&mut self, color: Color) {
        self.context.stroke.color = color;
        self.context.stroke.active = true;
    }

    pub fn stroke_weight(&mut self, weight: f32) {
        self.context.stroke.weight = weight;
    }

    pub fn no_stroke(&mut self) {
        self.context.stroke.active = false;
    }

    /// Suppresses stamps outside `[x1, y1, x2, y2]`.
    pub fn clip(&mut self, region: [f32; 4]) {
        self.context.stroke.clip = Some(region);
    }

    pub fn no_clip(&mut self) {
        self.context.stroke.clip = None;
    }

    // Strokes

    /// Straight stroke from (x1, y1) to (x2, y2), ignoring the field.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let length = dist(x1, y1, x2, y2);
        if length == 0.0 {
            return;
        }
        let path = StrokePath::Line {
            length,
            direction: calculate_angle(x1, y1, x2, y2),
            follow_field: false,
        };
        self.draw_path(x1, y1, path);
    }

    /// Stroke of `length` starting at (x, y) towards `direction` degrees,
    /// bent by the active field.
    pub fn flow_line(&mut self, x: f32, y: f32, length: f32, direction: f32) {
        let path = StrokePath::Line {
            length,
            direction,
            follow_field: true,
        };
        self.draw_path(x, y, path);
    }

    /// Strokes `plot` from (x, y) at `scale`.
    pub fn plot(&mut self, plot: &Plot, x: f32, y: f32, scale: f32) {
        self.draw_path(x, y, StrokePath::Plot { plot, scale });
    }

    /// One stamp of the current brush at (x, y).
    pub fn draw_tip(&mut self, x: f32, y: f32, pressure: f32) {
        self.with_brush(|env, style| draw_tip(env, style, x, y, pressure));
    }

    /// Runs a stroke with the current brush and returns the stamps laid.
    pub(super) fn draw_path(&mut self, x: f32, y: f32, path: StrokePath<'_>) -> usize {
        self.with_brush(|env, style| draw_stroke(env, style, x, y, path))
            .unwrap_or(0)
    }

    /// Prepares the mask of the current brush and hands it to `draw`.
    /// Blended brushes register their pigment with the compositor first.
    fn with_brush<R>(&mut self, draw: impl FnOnce(&mut StrokeEnv<'_, '_>, StrokeStyle<'_>) -> R) -> Option<R> {
        let stroke = &self.context.stroke;
        let Some(brush) = self.catalog.get(&stroke.brush) else {
            log::warn!("unknown brush `{}`", stroke.brush);
            return None;
        };
        if !tip_ready(brush, &mut self.images) {
            return None;
        }
        let target = brush.mask_target();
        if let MaskTarget::Blended(channel) = target {
            let pigment = Some(stroke.color.pigment());
            self.compositor
                .blend(&mut self.canvas, &mut self.rand, pigment, false, channel, false);
        }
        let field = self
            .field
            .view(self.context.field.as_deref(), self.field_offset());
        let mut layer = Layer::new(self.compositor.mask_mut(target));
        layer.apply(&self.context.transform);
        let mut env = StrokeEnv {
            layer: &mut layer,
            rand: &mut self.rand,
            images: &self.images,
            field,
            clip: stroke.clip,
        };
        let style = StrokeStyle {
            brush,
            color: stroke.color,
            weight: stroke.weight,
        };
        Some(draw(&mut env, style))
    }

    // Fields

    /// Registers a field generator; it becomes the field refreshes apply to.
    pub fn add_field(&mut self, name: &str, generator: FieldGenerator) {
        let mut env = FieldEnv {
            rand: &mut self.rand,
            noise: &self.noise,
        };
        self.field.add_field(name, generator, &mut env);
    }

    /// Steers following strokes with the field `name`.
    pub fn select_field(&mut self, name: &str) {
        if self.field.select(name) {
            self.context.field = Some(name.to_string());
        } else {
            log::warn!("unknown field `{}`", name);
        }
    }

    pub fn disable_field(&mut self) {
        self.context.field = None;
    }

    /// Regenerates the current field for time `t`.
    pub fn refresh_field(&mut self, t: f32) {
        let mut env = FieldEnv {
            rand: &mut self.rand,
            noise: &self.noise,
        };
        self.field.refresh(t, &mut env);
    }

    pub fn list_fields(&self) -> Vec<&str> {
        self.field.list_fields()
    }

    // Fill

    /// Watercolor fill with `opacity` on the 0..255 scale.
    pub fn fill(&mut self, color: Color, opacity: f32) {
        self.context.fill.set(color, opacity);
    }

    pub fn bleed(&mut self, strength: f32, direction: BleedDirection) {
        self.context.fill.set_bleed(strength, direction);
    }

    pub fn fill_texture(&mut self, texture: f32, border: f32) {
        self.context.fill.set_texture(texture, border);
    }

    pub fn gravity(&mut self, x: f32, y: f32) {
        self.context.fill.gravity = Some(pt2(x, y));
    }

    pub fn no_gravity(&mut self) {
        self.context.fill.gravity = None;
    }

    pub fn no_fill(&mut self) {
        self.context.fill.active = false;
    }

    // Hatch

    /// Hatches following shapes with lines `dist` apart at `angle` degrees.
    pub fn hatch(&mut self, dist: f32, angle: f32, options: HatchOptions) {
        let hatch = &mut self.context.hatch;
        hatch.active = true;
        hatch.dist = dist;
        hatch.angle = angle;
        hatch.options = options;
    }

    /// Draws hatches with their own brush instead of the stroke.
    pub fn set_hatch(&mut self, brush: &str, color: Color, weight: f32) {
        self.context.hatch.brush = Some(HatchBrush {
            brush: brush.to_string(),
            color,
            weight,
        });
    }

    pub fn no_hatch(&mut self) {
        self.context.hatch.active = false;
        self.context.hatch.brush = None;
    }

    // Erase

    /// Covers following shapes with `color` at `alpha` (0..255).
    pub fn erase(&mut self, color: Color, alpha: f32) {
        let erase = &mut self.context.erase;
        erase.active = true;
        erase.color = color;
        erase.alpha = alpha;
    }

    pub fn no_erase(&mut self) {
        self.context.erase.active = false;
    }

    // Polygon passes shared by shapes

    pub(super) fn fill_area(&mut self, polygon: &Polygon) {
        let fill = self.context.fill;
        if !fill.active {
            return;
        }
        let channel = Channel::Vector;
        self.compositor
            .blend(&mut self.canvas, &mut self.rand, Some(fill.color.pigment()), false, channel, true);
        let mut layer = Layer::new(self.compositor.mask_mut(MaskTarget::Blended(channel)));
        layer.apply(&self.context.transform);
        watercolor_fill(polygon, &fill, &mut layer, &mut self.rand);
    }

    /// Hatches several polygons as one area.
    pub fn hatch_polygons(&mut self, polygons: &[Polygon]) {
        let hatch = self.context.hatch.clone();
        if !hatch.active {
            return;
        }
        let lines = hatch_lines(polygons, hatch.dist, hatch.angle, &hatch.options, &mut self.rand);
        let saved = self.context.stroke.clone();
        if let Some(h) = &hatch.brush {
            self.set(&h.brush, h.color, h.weight);
        }
        for (a, b) in lines {
            self.line(a.x, a.y, b.x, b.y);
        }
        self.context.stroke = saved;
    }

    pub(super) fn outline(&mut self, polygon: &Polygon) {
        if !self.context.stroke.active {
            return;
        }
        for (a, b) in polygon.sides() {
            self.line(a.x, a.y, b.x, b.y);
        }
    }

    pub(super) fn cover(&mut self, polygon: &Polygon) {
        let erase = self.context.erase;
        if !erase.active || polygon.len() < 3 {
            return;
        }
        let mut layer = Layer::new(self.compositor.mask_mut(MaskTarget::PassThrough));
        layer.apply(&self.context.transform);
        layer.no_stroke();
        layer.fill(erase.color.with_alpha((erase.alpha / 255.0).clamp(0.0, 1.0)));
        layer.polygon(&polygon.vertices);
    }

    // Context stack

    pub fn push(&mut self) {
        self.stack.push(self.context.clone());
    }

    pub fn pop(&mut self) {
        match self.stack.pop() {
            Some(context) => self.context = context,
            None => log::warn!("pop without a matching push"),
        }
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.context.transform = self.context.transform.pre_translate(x, y);
    }

    /// Rotates following drawing by `degrees`, counter-clockwise on screen.
    pub fn rotate(&mut self, degrees: f32) {
        self.context.transform = self.context.transform.pre_rotate(-degrees);
    }

    pub fn scale(&mut self, s: f32) {
        self.context.transform = self.context.transform.pre_scale(s, s);
    }

    /// Canvas offset of the current origin, used to look up field cells.
    pub(super) fn field_offset(&self) -> Vec2 {
        vec2(self.context.transform.tx, self.context.transform.ty)
    }

    // Compositing

    pub fn color_cache(&mut self, caching: bool) {
        self.compositor.set_caching(caching);
    }

    /// Mixes everything still pending into the canvas.
    pub fn flush(&mut self) {
        self.compositor.flush_all(&mut self.canvas, &mut self.rand);
    }
}

/// Image tips draw nothing until their image is decoded.
fn tip_ready(brush: &Brush, images: &mut TipImages) -> bool {
    match brush.tip.image_source() {
        Some(source) if !images.is_loaded(source) => {
            images.warn_missing(source);
            false
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Raster;

    fn painter() -> Painter<Raster> {
        let mut canvas = Raster::new(100, 100).unwrap();
        canvas.background(Color::WHITE);
        let mut painter = Painter::load(canvas).unwrap();
        painter.seed(7);
        painter
    }

    fn ink(raster: &Raster) -> usize {
        raster.pixels().iter().filter(|p| p.red() < 252).count()
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_load_registers_standard_set() {
            let painter = painter();
            assert_eq!(painter.list_fields(), vec!["curved", "truncated", "zigzag", "waves", "seabed"]);
            assert!(painter.brushes().contains(&"HB"));
            assert!(painter.brushes().contains(&"marker2"));
            assert_eq!(painter.context().field, None);
        }

        #[test]
        fn test_unknown_names_leave_context_alone() {
            let mut painter = painter();
            painter.pick("nope");
            assert_eq!(painter.context().stroke.brush, "HB");
            painter.select_field("nope");
            assert_eq!(painter.context().field, None);
            painter.select_field("waves");
            assert_eq!(painter.context().field.as_deref(), Some("waves"));
            painter.disable_field();
            assert_eq!(painter.context().field, None);
        }

        #[test]
        fn test_push_pop_restores_context() {
            let mut painter = painter();
            let before = painter.context().clone();
            painter.push();
            painter.set("2B", Color::rgb(1.0, 0.0, 0.0), 3.0);
            painter.fill(Color::BLACK, 120.0);
            painter.hatch(4.0, 30.0, HatchOptions::default());
            painter.erase(Color::WHITE, 100.0);
            painter.translate(10.0, 5.0);
            painter.rotate(30.0);
            painter.clip([0.0, 0.0, 10.0, 10.0]);
            assert_ne!(painter.context(), &before);
            painter.pop();
            assert_eq!(painter.context(), &before);
            // Unbalanced pops are ignored
            painter.pop();
            assert_eq!(painter.context(), &before);
        }

        #[test]
        fn test_fill_settings_are_clamped() {
            let mut painter = painter();
            painter.bleed(0.9, BleedDirection::In);
            painter.fill_texture(2.0, 0.5);
            let fill = painter.context().fill;
            assert_eq!(fill.bleed.strength, 0.6);
            assert_eq!(fill.bleed.direction, BleedDirection::In);
            assert_eq!((fill.texture, fill.border), (1.0, 0.5));
        }
    }

    mod drawing_tests {
        use super::*;

        #[test]
        fn test_pencil_line_reaches_canvas_on_flush() {
            let mut painter = painter();
            painter.set("pen", Color::BLACK, 2.0);
            painter.line(10.0, 50.0, 90.0, 50.0);
            let canvas = painter.into_canvas();
            assert!(ink(&canvas) > 0);
            assert_eq!(canvas.pixel(50, 5), Some([1.0, 1.0, 1.0, 1.0]));
        }

        #[test]
        fn test_zero_length_line_draws_nothing() {
            let mut painter = painter();
            painter.line(10.0, 10.0, 10.0, 10.0);
            let canvas = painter.into_canvas();
            assert_eq!(ink(&canvas), 0);
        }

        #[test]
        fn test_marker_is_mixed_not_pasted() {
            let mut painter = painter();
            painter.set("marker", Color::rgb(0.0, 0.0, 1.0), 2.0);
            painter.line(10.0, 50.0, 90.0, 50.0);
            assert!(painter.compositor.state(Channel::Vector).pending);
            assert_eq!(ink(painter.canvas()), 0);
            painter.flush();
            assert!(!painter.compositor.state(Channel::Vector).pending);
            assert!(ink(painter.canvas()) > 0);
        }

        #[test]
        fn test_missing_image_tip_is_skipped() {
            let mut painter = painter();
            let spec: BrushSpec = serde_json::from_str(
                r#"{"type": "image", "weight": 10, "opacity": 100, "spacing": 1, "image": {"src": "tips/missing.png"}}"#,
            )
            .unwrap();
            painter.add_brush_spec("stamp", spec).unwrap();
            painter.set("stamp", Color::BLACK, 1.0);
            assert_eq!(painter.draw_path(10.0, 10.0, StrokePath::Line { length: 50.0, direction: 0.0, follow_field: false }), 0);
            assert!(painter.images.pending().contains(&"tips/missing.png".to_string()));
        }

        #[test]
        fn test_clip_limits_strokes() {
            let mut painter = painter();
            painter.set("pen", Color::BLACK, 2.0);
            painter.clip([0.0, 0.0, 40.0, 100.0]);
            painter.line(10.0, 50.0, 90.0, 50.0);
            let canvas = painter.into_canvas();
            let right = (60..100).map(|x| canvas.pixel(x, 50).map_or(1.0, |p| p[0])).fold(1.0, f32::min);
            assert!(right > 0.99);
        }

        #[test]
        fn test_hatch_restores_stroke_state() {
            let mut painter = painter();
            painter.no_stroke();
            painter.hatch(10.0, 0.0, HatchOptions::default());
            painter.set_hatch("2H", Color::BLACK, 4.0);
            let square = Polygon::from_points(&[[20.0, 20.0], [80.0, 20.0], [80.0, 80.0], [20.0, 80.0]]);
            painter.hatch_polygons(&[square]);
            assert!(!painter.context().stroke.active);
            assert_eq!(painter.context().stroke.brush, "HB");
            let canvas = painter.into_canvas();
            assert!(ink(&canvas) > 0);
        }
    }
}
