// src/utilities/trig.rs
//
// Quarter-degree sine/cosine lookup. Stamping calls these thousands of times
// per stroke, so the table is built once and shared.

use std::sync::OnceLock;

const STEPS_PER_DEGREE: f32 = 4.0;
const TABLE_SIZE: usize = 1440;

struct TrigTable {
    sin: Vec<f32>,
    cos: Vec<f32>,
}

fn table() -> &'static TrigTable {
    static TABLE: OnceLock<TrigTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let radians = |i: usize| (i as f32 / STEPS_PER_DEGREE).to_radians();
        TrigTable {
            sin: (0..TABLE_SIZE).map(|i| radians(i).sin()).collect(),
            cos: (0..TABLE_SIZE).map(|i| radians(i).cos()).collect(),
        }
    })
}

fn index(degrees: f32) -> usize {
    let wrapped = ((degrees % 360.0) + 360.0) % 360.0;
    ((STEPS_PER_DEGREE * wrapped).floor() as usize).min(TABLE_SIZE - 1)
}

pub fn sin_deg(degrees: f32) -> f32 {
    table().sin[index(degrees)]
}

pub fn cos_deg(degrees: f32) -> f32 {
    table().cos[index(degrees)]
}
