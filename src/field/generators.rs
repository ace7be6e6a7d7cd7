// src/field/generators.rs
//
// The standard field generators registered on load. Each one draws its
// per-field constants from the env's random source, then fills the grid.

use rayon::prelude::*;
use std::sync::Arc;

use super::flow_field::{FieldEnv, FieldGenerator, FieldGrid};
use crate::utilities::{cos_deg, map, sin_deg};

pub fn standard_fields() -> Vec<(&'static str, FieldGenerator)> {
    vec![
        ("curved", Arc::new(curved) as FieldGenerator),
        ("truncated", Arc::new(truncated) as FieldGenerator),
        ("zigzag", Arc::new(zigzag) as FieldGenerator),
        ("waves", Arc::new(waves) as FieldGenerator),
        ("seabed", Arc::new(seabed) as FieldGenerator),
    ]
}

// Half the time the range flips sign, which flips the field's swirl
fn maybe_flip(env: &mut FieldEnv<'_>, range: f32) -> f32 {
    if env.rand.rand_int(0, 100) % 2 == 0 {
        -range
    } else {
        range
    }
}

/// Smooth noise-driven swirl that drifts with time.
pub fn curved(t: f32, mut grid: FieldGrid, env: &mut FieldEnv<'_>) -> FieldGrid {
    let base = env.rand.rand_int(-25, -15) as f32;
    let range = maybe_flip(env, base);
    let noise = env.noise;

    grid.columns_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(column, cells)| {
            for (row, cell) in cells.iter_mut().enumerate() {
                let n = noise.get(
                    column as f32 * 0.02 + t * 0.03,
                    row as f32 * 0.02 + t * 0.03,
                );
                *cell = 3.0 * map(n, 0.0, 1.0, -range, range, false);
            }
        });
    grid
}

/// Noise field quantized into bands, giving faceted turns.
pub fn truncated(t: f32, mut grid: FieldGrid, env: &mut FieldEnv<'_>) -> FieldGrid {
    let base = env.rand.rand_int(-25, -15) as f32 + 5.0 * sin_deg(t);
    let range = maybe_flip(env, base);
    let truncate = env.rand.rand_int(5, 10) as f32;
    let noise = env.noise;

    grid.columns_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(column, cells)| {
            for (row, cell) in cells.iter_mut().enumerate() {
                let n = noise.get(column as f32 * 0.02, row as f32 * 0.02);
                let angle = map(n, 0.0, 1.0, -range, range, false);
                *cell = 4.0 * (angle / truncate).round() * truncate;
            }
        });
    grid
}

/// Alternating angles, cell by cell.
pub fn zigzag(t: f32, mut grid: FieldGrid, env: &mut FieldEnv<'_>) -> FieldGrid {
    let base = env.rand.rand_int(-30, -15) as f32 + (44.0 * sin_deg(t)).abs();
    let mut dif = maybe_flip(env, base);
    let mut angle = 0.0;

    for cells in grid.columns_mut() {
        for cell in cells.iter_mut() {
            *cell = angle;
            angle += dif;
            dif = -dif;
        }
        angle += dif;
        dif = -dif;
    }
    grid
}

pub fn waves(t: f32, mut grid: FieldGrid, env: &mut FieldEnv<'_>) -> FieldGrid {
    let sin_range = env.rand.rand_int(10, 15) as f32 + 5.0 * sin_deg(t);
    let cos_range = env.rand.rand_int(3, 6) as f32 + 3.0 * cos_deg(t);
    let base = env.rand.rand_int(20, 35) as f32;

    for (column, cells) in grid.columns_mut().iter_mut().enumerate() {
        for (row, cell) in cells.iter_mut().enumerate() {
            let wave = sin_deg(sin_range * column as f32) * (base * cos_deg(row as f32 * cos_range));
            *cell = wave + env.rand.rand_int(-3, 3) as f32;
        }
    }
    grid
}

pub fn seabed(t: f32, mut grid: FieldGrid, env: &mut FieldEnv<'_>) -> FieldGrid {
    let base_size = env.rand.random(0.4, 0.8);
    let base = env.rand.rand_int(18, 26) as f32;

    for (column, cells) in grid.columns_mut().iter_mut().enumerate() {
        for (row, cell) in cells.iter_mut().enumerate() {
            let addition = env.rand.rand_int(15, 20) as f32;
            let angle = base * sin_deg(base_size * row as f32 * column as f32 + addition);
            *cell = 1.1 * angle * cos_deg(t);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldLayout;
    use crate::utilities::{Noise, Rand};

    fn generate(generator: &FieldGenerator, t: f32, seed: u64) -> FieldGrid {
        let layout = FieldLayout::for_canvas(60.0, 40.0);
        let mut rand = Rand::seeded(seed);
        let noise = Noise::seeded(seed as u32);
        let mut env = FieldEnv {
            rand: &mut rand,
            noise: &noise,
        };
        generator(t, layout.empty_grid(), &mut env)
    }

    #[test]
    fn test_every_standard_field_fills_the_grid() {
        for (name, generator) in standard_fields() {
            let grid = generate(&generator, 0.0, 3);
            assert_eq!(grid.columns(), 200, "{name}");
            assert_eq!(grid.rows(), 133, "{name}");
            let total: f32 = (0..grid.columns() as i64)
                .flat_map(|c| (0..grid.rows() as i64).map(move |r| (c, r)))
                .map(|(c, r)| grid.angle_at(c, r).abs())
                .sum();
            assert!(total > 0.0, "{name} left the grid empty");
        }
    }

    #[test]
    fn test_generators_are_deterministic_per_seed() {
        for (name, generator) in standard_fields() {
            let a = generate(&generator, 1.5, 21);
            let b = generate(&generator, 1.5, 21);
            assert_eq!(a, b, "{name}");
        }
    }

    #[test]
    fn test_curved_stays_within_its_range() {
        let grid = generate(&standard_fields()[0].1, 0.0, 8);
        for c in 0..grid.columns() as i64 {
            for r in 0..grid.rows() as i64 {
                assert!(grid.angle_at(c, r).abs() <= 3.0 * 25.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_zigzag_alternates() {
        let grid = generate(&standard_fields()[2].1, 0.0, 4);
        let first = grid.angle_at(0, 1) - grid.angle_at(0, 0);
        let second = grid.angle_at(0, 2) - grid.angle_at(0, 1);
        assert!((first + second).abs() < 1e-4);
        assert!(first.abs() > 0.0);
    }
}
