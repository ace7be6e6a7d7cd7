// src/fill/watercolor.rs
//
// Watercolor fill: fill settings carried by the draw context and the
// layered grow/erode engine that paints a polygon into the vector mask.

use nannou::prelude::*;

use super::fill_polygon::{Bleed, BleedDirection, FillPolygon, TEXTURE_GROWTH};
use crate::models::{Color, Polygon};
use crate::render::Layer;
use crate::utilities::{map, Rand};

pub const MAX_BLEED: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillState {
    pub active: bool,
    pub color: Color,
    /// 0..255
    pub opacity: f32,
    pub bleed: Bleed,
    pub texture: f32,
    pub border: f32,
    /// Point the wash starts from; the nearest vertex leads the outline.
    pub gravity: Option<Point2>,
}

impl Default for FillState {
    fn default() -> Self {
        Self {
            active: false,
            color: Color::from_rgb8(0x00, 0x21, 0x85),
            opacity: 80.0,
            bleed: Bleed {
                strength: 0.07,
                direction: BleedDirection::Out,
            },
            texture: 0.4,
            border: 0.4,
            gravity: None,
        }
    }
}

impl FillState {
    /// Turns the fill on with a color and 0..255 opacity.
    pub fn set(&mut self, color: Color, opacity: f32) {
        self.active = true;
        self.color = color;
        self.opacity = opacity;
    }

    pub fn set_bleed(&mut self, strength: f32, direction: BleedDirection) {
        self.bleed = Bleed {
            strength: strength.clamp(0.0, MAX_BLEED),
            direction,
        };
    }

    pub fn set_texture(&mut self, texture: f32, border: f32) {
        self.texture = texture.clamp(0.0, 1.0);
        self.border = border.clamp(0.0, 1.0);
    }

    /// Layer intensity on the 0..20 scale the engine works in.
    pub fn intensity(&self) -> f32 {
        map(self.opacity, 0.0, 155.0, 0.0, 20.0, true).floor()
    }
}

/// Index of the vertex the outline starts from.
fn start_vertex(vertices: &[Point2], gravity: Option<Point2>, rand: &mut Rand) -> usize {
    let n = vertices.len();
    let mut shift = (rand.rand_int(0, n as i32).max(0) as usize).min(n - 1);
    if let Some(g) = gravity {
        for (i, v) in vertices.iter().enumerate() {
            if v.distance(g) < vertices[shift].distance(g) {
                shift = i;
            }
        }
    }
    shift
}

/// Builds the seed polygon for a fill of `polygon`.
pub fn seed_polygon(polygon: &Polygon, state: &FillState, rand: &mut Rand) -> Option<FillPolygon> {
    let n = polygon.len();
    if n < 3 {
        return None;
    }
    let fluid = n as f32 * rand.random(0.4, 1.0);
    let strength = state.bleed.strength;
    let modifiers: Vec<f32> = (0..n)
        .map(|i| {
            let m = rand.random(0.8, 1.2) * strength;
            if (i as f32) < fluid {
                (m * 2.0).clamp(0.0, 0.9)
            } else {
                m
            }
        })
        .collect();

    let shift = start_vertex(&polygon.vertices, state.gravity, rand);
    let mut vertices = polygon.vertices.clone();
    vertices.rotate_left(shift);
    let center = polygon.centroid();
    Some(FillPolygon::from_source(polygon, vertices, modifiers, center))
}

/// Paints a watercolor wash of `polygon` into `layer`, which should target
/// the vector mask. Returns false when the polygon is degenerate.
pub fn watercolor_fill(polygon: &Polygon, state: &FillState, layer: &mut Layer<'_>, rand: &mut Rand) -> bool {
    let Some(base) = seed_polygon(polygon, state, rand) else {
        return false;
    };
    let bleed = state.bleed;
    let intensity = state.intensity();
    let tex = state.texture;

    let spread = map(bleed.strength, 0.0, 0.15, 0.6, 1.0, true);
    let layers = 24.0 * spread;
    let third = intensity / 5.0 + tex * intensity / 6.0;
    let quarter = intensity / 4.0 + tex * intensity / 3.0;
    let fifth = intensity / 7.0 + tex * intensity / 3.0;
    let half = intensity / 5.0;
    let texture = tex * 3.0;

    let mut body = base.grow(1.0, false, &bleed, rand);
    let mut veil = body.grow(1.0, false, &bleed, rand).grow(0.9, false, &bleed, rand);
    let mut wash = veil.grow(0.75, false, &bleed, rand);
    let mut rim = base.grow(0.6, false, &bleed, rand);

    let quarters = [
        (layers / 4.0).floor() as usize,
        (layers / 2.0).floor() as usize,
        (3.0 * layers / 4.0).floor() as usize,
    ];

    layer.push();
    layer.no_stroke();
    let count = layers.ceil() as usize;
    for i in 0..count {
        if quarters.contains(&i) {
            body = body.grow(1.0, false, &bleed, rand);
            if spread >= 1.0 || i == quarters[1] {
                veil = veil.grow(0.75, false, &bleed, rand);
                wash = wash.grow(0.75, false, &bleed, rand);
                rim = rim.grow(TEXTURE_GROWTH, true, &bleed, rand);
            }
        }

        body.grow(1.0, false, &bleed, rand).layer(layer, i, half, Some(state.border));
        rim.grow(TEXTURE_GROWTH, true, &bleed, rand)
            .grow(TEXTURE_GROWTH, false, &bleed, rand)
            .layer(layer, i, fifth, None);
        veil.grow(TEXTURE_GROWTH, false, &bleed, rand)
            .grow(TEXTURE_GROWTH, false, &bleed, rand)
            .layer(layer, i, quarter, None);
        wash.grow(0.8, false, &bleed, rand)
            .grow(TEXTURE_GROWTH, false, &bleed, rand)
            .layer(layer, i, third, None);

        if texture != 0.0 {
            body.erode(layer, rand, texture, intensity);
        }
    }
    layer.pop();
    true
}
