// src/utilities/mod.rs
// Numeric building blocks shared by every stage of the pipeline

pub mod geometry;
pub mod noise;
pub mod random;
pub mod trig;

pub use geometry::{calculate_angle, dist, intersect_lines, rotate_about};
pub use self::noise::Noise;
pub use random::{constrain, map, normalize_degrees, Rand};
pub use trig::{cos_deg, sin_deg};
