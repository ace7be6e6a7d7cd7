// src/utilities/noise.rs
//
// Coherent noise source for the field generators, remapped to [0, 1].

use noise::{NoiseFn, Perlin};

#[derive(Debug, Clone)]
pub struct Noise {
    perlin: Perlin,
}

impl Noise {
    pub fn seeded(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    pub fn reseed(&mut self, seed: u32) {
        self.perlin = Perlin::new(seed);
    }

    /// Smooth 2D noise in [0, 1].
    pub fn get(&self, x: f32, y: f32) -> f32 {
        let raw = self.perlin.get([x as f64, y as f64]) as f32;
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::seeded(0)
    }
}
