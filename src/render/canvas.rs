// src/render/canvas.rs
//
// The destination surface contract and the CPU pigment mixer for Raster.
// `mix` lays the cached pigment into the canvas wherever the mask has
// coverage, with per-channel Kubelka-Munk mixing in linear RGB.

use nannou::color::{LinSrgb, Srgb};
use tiny_skia::{ColorU8, PremultipliedColorU8};

use super::raster::Raster;
use crate::utilities::Noise;

/// Inputs for one pigment mixing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixUniforms {
    pub pigment: [f32; 3],
    /// Watercolor mode: desaturated, noisy pigment. Off is flat marker mixing.
    pub watercolor: bool,
    pub random: [f32; 3],
}

impl MixUniforms {
    fn noise(&self) -> Noise {
        Noise::seeded((self.random[0].clamp(0.0, 1.0) * u32::MAX as f32) as u32)
    }
}

/// A surface the compositor can flush masks into.
pub trait Canvas {
    fn size(&self) -> (u32, u32);

    /// Source-over copy of an already colored layer.
    fn paste(&mut self, layer: &Raster);

    /// One pigment mixing pass driven by the alpha of `mask`.
    fn mix(&mut self, mask: &Raster, uniforms: &MixUniforms);
}

impl Canvas for Raster {
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn paste(&mut self, layer: &Raster) {
        if layer.width() == self.width() && layer.height() == self.height() {
            self.composite_over(layer);
        }
    }

    fn mix(&mut self, mask: &Raster, uniforms: &MixUniforms) {
        if mask.width() != self.width() || mask.height() != self.height() {
            return;
        }
        let width = self.width() as usize;
        let (w, h) = (self.width() as f32, self.height() as f32);
        let noise = uniforms.noise();

        for (i, (dst, m)) in self.pixels_mut().iter_mut().zip(mask.pixels()).enumerate() {
            if m.alpha() == 0 {
                continue;
            }
            let coverage = m.alpha() as f32 / 255.0;
            let (x, y) = ((i % width) as f32, (i / width) as f32);
            let (u, v) = (x / w, y / h);

            let mut pigment = uniforms.pigment;
            if uniforms.watercolor {
                let grain = 0.25 + 0.25 * noise.get(u * 4.0, v * 4.0);
                pigment = desaturate(pigment, grain);
                let tint = 0.03 * (pigment[0] - pigment[1] - pigment[2]).abs();
                for (c, r) in pigment.iter_mut().zip(uniforms.random) {
                    *c += tint * (noise.get(u * 5.0 + 10.0 * r, v * 5.0) * 2.0 - 1.0);
                }
            }
            // Dense mask areas dry darker at the edges
            if coverage > 0.7 {
                let a = 0.5 * (coverage - 0.7);
                pigment.iter_mut().for_each(|c| *c = *c * (1.0 - a) - 0.5 * a);
            }

            let mut mixed = km_mix(paper(*dst), pigment.map(|c| c.clamp(0.0, 1.0)), 0.9 * coverage);
            for (c, value) in mixed.iter_mut().enumerate() {
                // Fine grain keeps large flat washes from banding
                let offset = 17.3 * (c + 1) as f32;
                *value += 0.01 * (noise.get(x * 0.9 + offset, y * 0.9 - offset) * 2.0 - 1.0);
            }
            let [r, g, b] = mixed.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
            *dst = ColorU8::from_rgba(r, g, b, 255).premultiply();
        }
    }
}

/// Canvas color under a pixel, seen over white paper.
fn paper(p: PremultipliedColorU8) -> [f32; 3] {
    let bare = 1.0 - p.alpha() as f32 / 255.0;
    [p.red(), p.green(), p.blue()].map(|c| c as f32 / 255.0 + bare)
}

/// Mixes two sRGB reflectances with pigment concentration `t` of `b`.
pub fn km_mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let la: LinSrgb = Srgb::new(a[0], a[1], a[2]).into_linear();
    let lb: LinSrgb = Srgb::new(b[0], b[1], b[2]).into_linear();
    let absorption = |r: f32| {
        let r = r.clamp(1e-4, 1.0);
        (1.0 - r).powi(2) / (2.0 * r)
    };
    let reflectance = |ra: f32, rb: f32| {
        let ks = (1.0 - t) * absorption(ra) + t * absorption(rb);
        1.0 + ks - (ks * ks + 2.0 * ks).sqrt()
    };
    let mixed = LinSrgb::new(
        reflectance(la.red, lb.red),
        reflectance(la.green, lb.green),
        reflectance(la.blue, lb.blue),
    );
    let out = Srgb::from_linear(mixed);
    [out.red, out.green, out.blue].map(|c| c.clamp(0.0, 1.0))
}

fn desaturate(c: [f32; 3], amount: f32) -> [f32; 3] {
    let luma = 0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2];
    c.map(|v| v + (luma - v) * amount)
}
