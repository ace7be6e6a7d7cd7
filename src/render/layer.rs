// src/render/layer.rs
//
// Drawing cursor over a mask raster: a transform stack plus fill, stroke
// and erase state, in the spirit of an immediate-mode sketch context.
// Custom brush tips receive a Layer to draw their geometry.

use nannou::prelude::*;
use tiny_skia::{Path, PathBuilder, Transform};

use super::raster::{Ink, Raster};
use crate::models::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayerState {
    transform: Transform,
    fill: Option<Color>,
    stroke: Option<(Color, f32)>,
    erase: Option<f32>,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            fill: Some(Color::BLACK),
            stroke: None,
            erase: None,
        }
    }
}

pub struct Layer<'a> {
    raster: &'a mut Raster,
    state: LayerState,
    stack: Vec<LayerState>,
}

impl<'a> Layer<'a> {
    pub fn new(raster: &'a mut Raster) -> Self {
        Self {
            raster,
            state: LayerState::default(),
            stack: Vec::new(),
        }
    }

    pub fn raster(&self) -> &Raster {
        self.raster
    }

    pub fn push(&mut self) {
        self.stack.push(self.state);
    }

    pub fn pop(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    /// Appends `transform` to the current one.
    pub fn apply(&mut self, transform: &Transform) {
        self.state.transform = self.state.transform.pre_concat(*transform);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    /// Positive angles turn clockwise on the y-down raster.
    pub fn rotate(&mut self, degrees: f32) {
        self.state.transform = self.state.transform.pre_rotate(degrees);
    }

    pub fn scale(&mut self, s: f32) {
        self.state.transform = self.state.transform.pre_scale(s, s);
    }

    pub fn fill(&mut self, color: Color) {
        self.state.fill = Some(color);
    }

    pub fn no_fill(&mut self) {
        self.state.fill = None;
    }

    pub fn stroke(&mut self, color: Color, weight: f32) {
        self.state.stroke = Some((color, weight));
    }

    pub fn no_stroke(&mut self) {
        self.state.stroke = None;
    }

    /// Following shapes remove `strength` of the alpha under them instead
    /// of painting.
    pub fn erase(&mut self, strength: f32) {
        self.state.erase = Some(strength.clamp(0.0, 1.0));
    }

    pub fn no_erase(&mut self) {
        self.state.erase = None;
    }

    fn ink(&self, color: Color) -> Ink {
        match self.state.erase {
            Some(strength) => Ink::Erase(strength),
            None => Ink::Paint(color),
        }
    }

    /// Circle of diameter `d` centred at (x, y).
    pub fn circle(&mut self, x: f32, y: f32, d: f32) {
        if let Some(path) = PathBuilder::from_circle(x, y, d.abs() / 2.0) {
            self.draw(&path);
        }
    }

    /// Rectangle with its top-left corner at (x, y).
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.polygon(&[pt2(x, y), pt2(x + w, y), pt2(x + w, y + h), pt2(x, y + h)]);
    }

    /// Closed polygon through `points`.
    pub fn polygon(&mut self, points: &[Point2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.draw(&path);
        }
    }

    fn draw(&mut self, path: &Path) {
        let transform = self.state.transform;
        if let Some(fill) = self.state.fill {
            let ink = self.ink(fill);
            self.raster.fill_path(path, ink, transform);
        }
        if let Some((color, weight)) = self.state.stroke {
            let ink = self.ink(color);
            self.raster.stroke_path(path, weight, ink, transform);
        }
    }

    /// Draws `image` into the rectangle (x, y, w, h) of the current
    /// transform, colored by the fill.
    pub fn image(&mut self, image: &Raster, x: f32, y: f32, w: f32, h: f32) {
        let Some(fill) = self.state.fill else {
            return;
        };
        let place = self
            .state
            .transform
            .pre_translate(x, y)
            .pre_scale(w / image.width() as f32, h / image.height() as f32);
        let ink = self.ink(fill);
        self.raster.draw_image(image, place, ink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_restores_transform_and_fill() {
        let mut raster = Raster::new(40, 40).unwrap();
        let mut layer = Layer::new(&mut raster);
        layer.push();
        layer.translate(20.0, 20.0);
        layer.no_fill();
        layer.pop();
        assert_eq!(layer.transform(), Transform::identity());
        layer.circle(5.0, 5.0, 4.0);
        assert_eq!(raster.alpha(5, 5), 1.0);
    }

    #[test]
    fn test_shapes_follow_transform() {
        let mut raster = Raster::new(40, 40).unwrap();
        {
            let mut layer = Layer::new(&mut raster);
            layer.translate(20.0, 20.0);
            layer.scale(2.0);
            layer.rect(-2.0, -2.0, 4.0, 4.0);
        }
        assert_eq!(raster.alpha(16, 16), 1.0);
        assert_eq!(raster.alpha(23, 23), 1.0);
        assert_eq!(raster.alpha(25, 25), 0.0);
    }

    #[test]
    fn test_positive_rotation_turns_clockwise() {
        let mut raster = Raster::new(40, 40).unwrap();
        {
            let mut layer = Layer::new(&mut raster);
            layer.translate(20.0, 20.0);
            layer.rotate(90.0);
            layer.rect(0.0, 0.0, 10.0, 2.0);
        }
        // The x axis now points down the raster
        assert_eq!(raster.alpha(19, 25), 1.0);
        assert_eq!(raster.alpha(25, 19), 0.0);
    }

    #[test]
    fn test_stroke_only_outlines() {
        let mut raster = Raster::new(40, 40).unwrap();
        {
            let mut layer = Layer::new(&mut raster);
            layer.no_fill();
            layer.stroke(Color::BLACK, 2.0);
            layer.rect(10.0, 10.0, 20.0, 20.0);
        }
        assert_eq!(raster.alpha(10, 20), 1.0);
        assert_eq!(raster.alpha(20, 20), 0.0);
    }

    #[test]
    fn test_image_fills_target_rect() {
        let tip = Raster::from_rgba8(1, 1, &[255, 255, 255, 255]).unwrap();
        let mut raster = Raster::new(20, 20).unwrap();
        {
            let mut layer = Layer::new(&mut raster);
            layer.fill(Color::rgb(0.0, 0.0, 1.0));
            layer.translate(5.0, 5.0);
            layer.image(&tip, 0.0, 0.0, 4.0, 4.0);
        }
        assert_eq!(raster.pixel(6, 6), Some([0.0, 0.0, 1.0, 1.0]));
        assert_eq!(raster.alpha(9, 9), 0.0);
    }

    #[test]
    fn test_erase_state_cuts_holes() {
        let mut raster = Raster::new(10, 10).unwrap();
        raster.background(Color::WHITE);
        {
            let mut layer = Layer::new(&mut raster);
            layer.erase(1.0);
            layer.circle(5.0, 5.0, 4.0);
            layer.no_erase();
        }
        assert_eq!(raster.alpha(5, 5), 0.0);
        assert_eq!(raster.alpha(0, 0), 1.0);
    }
}
