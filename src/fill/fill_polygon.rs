// src/fill/fill_polygon.rs
//
// The deformable polygon behind watercolor fills. Each `grow` inserts a
// displaced midpoint on every edge, pushing the outline out (or in) by a
// per-vertex modifier; layering many translucent grown copies gives the
// soft, bleeding edge of a wash.

use nannou::prelude::*;

use crate::models::{Color, Polygon};
use crate::render::Layer;
use crate::utilities::{constrain, map, rotate_about, Rand};

/// Which way the wash bleeds across the source outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BleedDirection {
    #[default]
    Out,
    In,
}

impl BleedDirection {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "in" => BleedDirection::In,
            _ => BleedDirection::Out,
        }
    }

    fn angle(self) -> f32 {
        match self {
            BleedDirection::Out => -90.0,
            BleedDirection::In => 90.0,
        }
    }
}

/// Bleed settings shared by every polygon grown from one fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bleed {
    pub strength: f32,
    pub direction: BleedDirection,
}

/// Growth factor meaning "use the fixed texture modifier".
pub const TEXTURE_GROWTH: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct FillPolygon {
    pub vertices: Vec<Point2>,
    pub modifiers: Vec<f32>,
    /// Per edge: true when the edge's outward normal points away from the
    /// source shape.
    pub outward: Vec<bool>,
    pub center: Point2,
    /// Largest vertex distance from the center.
    pub size: f32,
}

fn is_left(a: Point2, b: Point2, c: Point2) -> bool {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) > 0.01
}

impl FillPolygon {
    pub fn new(vertices: Vec<Point2>, modifiers: Vec<f32>, center: Point2, outward: Vec<bool>) -> Self {
        let size = vertices
            .iter()
            .map(|v| v.distance(center))
            .fold(f32::NEG_INFINITY, f32::max);
        Self {
            vertices,
            modifiers,
            outward,
            center,
            size,
        }
    }

    /// First polygon of a fill. Edge directions are found by casting the
    /// edge normal from its midpoint and counting crossings with `source`
    /// on the left side of the edge: an even count means the normal points
    /// out of the shape.
    pub fn from_source(source: &Polygon, vertices: Vec<Point2>, modifiers: Vec<f32>, center: Point2) -> Self {
        let n = vertices.len();
        let outward = (0..n)
            .map(|i| {
                let (v1, v2) = (vertices[i], vertices[(i + 1) % n]);
                let side = v2 - v1;
                let normal = rotate_about(Point2::ZERO, side, 90.0);
                let mid = v1 + side / 2.0;
                let crossings = source
                    .intersect(mid, mid + normal)
                    .into_iter()
                    .filter(|p| is_left(v1, v2, *p))
                    .count();
                crossings % 2 == 0
            })
            .collect();
        Self::new(vertices, modifiers, center, outward)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drops a run of vertices from the middle of large polygons so that
    /// partially grown texture layers stay open on one side.
    pub fn trim(&self, factor: f32) -> (Vec<Point2>, Vec<f32>, Vec<bool>) {
        let mut vertices = self.vertices.clone();
        let mut modifiers = self.modifiers.clone();
        let mut outward = self.outward.clone();
        let n = vertices.len();
        if n > 10 && factor >= 0.2 {
            let count = ((1.0 - factor) * n as f32).floor() as usize;
            let start = (n - count) / 2;
            let end = (start + count).min(n);
            vertices.drain(start..end);
            modifiers.drain(start.min(modifiers.len())..end.min(modifiers.len()));
            outward.drain(start.min(outward.len())..end.min(outward.len()));
        }
        (vertices, modifiers, outward)
    }

    /// New polygon with a displaced midpoint inserted on every edge.
    /// `degrow` pulls the midpoints the other way at half strength.
    pub fn grow(&self, factor: f32, degrow: bool, bleed: &Bleed, rand: &mut Rand) -> FillPolygon {
        let (vertices, modifiers, outward) = self.trim(factor);
        let n = vertices.len();
        let adjustment = if degrow { -0.5 } else { 1.0 };

        let mut grown = Vec::with_capacity(n * 2);
        let mut grown_modifiers = Vec::with_capacity(n * 2);
        let mut grown_outward = Vec::with_capacity(n * 2);

        for i in 0..n {
            let current = vertices[i];
            let next = vertices[(i + 1) % n];
            let base = if (factor - TEXTURE_GROWTH).abs() < f32::EPSILON {
                if bleed.strength <= 0.1 {
                    0.25
                } else {
                    0.75
                }
            } else {
                modifiers.get(i).copied().unwrap_or(bleed.strength)
            };
            let modifier = base * adjustment;

            grown.push(current);
            grown_modifiers.push(modifier + (rand.gaussian(0.5, 0.1) - 0.5) * 0.1);

            let side = next - current;
            let out = outward.get(i).copied().unwrap_or(true);
            let rotation = if out { bleed.direction.angle() } else { -bleed.direction.angle() }
                + rand.gaussian(0.0, 0.4) * 45.0;
            let lerp = constrain(rand.gaussian(0.5, 0.2), 0.1, 0.9);
            let mult = rand.gaussian(0.5, 0.2) * rand.random(0.6, 1.4) * modifier;
            let push = rotate_about(Point2::ZERO, side, rotation);

            grown.push(current + side * lerp + push * mult);
            grown_modifiers.push(modifier + (rand.gaussian(0.5, 0.1) - 0.5) * 0.1);
            grown_outward.push(out);
            grown_outward.push(out);
        }

        FillPolygon::new(grown, grown_modifiers, self.center, grown_outward)
    }

    /// Paints the polygon as one translucent layer. `alpha` is on the
    /// 0..255 scale. `border` outlines the first body layers.
    pub fn layer(&self, layer: &mut Layer<'_>, index: usize, alpha: f32, border: Option<f32>) {
        layer.fill(Color::rgb(1.0, 0.0, 0.0).with_alpha((alpha / 255.0).clamp(0.0, 1.0)));
        match border {
            Some(strength) => {
                let weight = map(index as f32, 0.0, 24.0, 6.0, 0.5, false).max(0.0);
                let outline = Color::rgb(1.0, 0.0, 0.0).with_alpha((0.5 + 1.5 * strength) / 255.0);
                layer.stroke(outline, weight);
            }
            None => layer.no_stroke(),
        }
        layer.polygon(&self.vertices);
        layer.no_stroke();
    }

    /// Knocks random holes into the wash around the center.
    pub fn erode(&self, layer: &mut Layer<'_>, rand: &mut Rand, texture: f32, intensity: f32) {
        let circles = rand.random(130.0, 200.0) as usize;
        let half = self.size / 2.0;
        let strength = (3.5 * texture - map(intensity, 80.0, 120.0, 0.3, 1.0, true)) / 255.0;
        if strength <= 0.0 {
            return;
        }
        layer.push();
        layer.no_stroke();
        layer.erase(strength);
        for _ in 0..circles {
            let x = self.center.x + rand.gaussian(0.0, half);
            let y = self.center.y + rand.gaussian(0.0, half);
            let d = rand.random(0.025 * self.size, 0.19 * self.size);
            layer.circle(x, y, d);
        }
        layer.no_erase();
        layer.pop();
    }
}
