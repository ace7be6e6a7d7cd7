// src/models/color.rs
//
// Straight-alpha sRGB color used for strokes, fills and hatches, plus the
// hex parsing shared by config and brush catalog files.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("`{0}` is not a hex color (expected #rgb or #rrggbb)")]
    InvalidHex(String),
}

/// Straight (not premultiplied) sRGB color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn hex(value: &str) -> Result<Self, ColorError> {
        static HEX: OnceLock<Regex> = OnceLock::new();
        let pattern = HEX.get_or_init(|| {
            Regex::new(r"^#?(?:([0-9a-fA-F]{6})|([0-9a-fA-F]{3}))$").expect("hex pattern")
        });

        let caps = pattern
            .captures(value.trim())
            .ok_or_else(|| ColorError::InvalidHex(value.to_string()))?;

        let digits = match (caps.get(1), caps.get(2)) {
            (Some(long), _) => long.as_str().to_string(),
            (None, Some(short)) => short.as_str().chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ColorError::InvalidHex(value.to_string())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidHex(value.to_string()))
        };
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// RGB triple handed to the pigment mixer.
    pub fn pigment(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::hex(&value)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        let fill = Color::hex("#002185").unwrap();
        assert!((fill.b - 133.0 / 255.0).abs() < 1e-6);
        assert_eq!(fill.r, 0.0);

        let short = Color::hex("fff").unwrap();
        assert_eq!(short, Color::WHITE);
    }

    #[test]
    fn test_reject_malformed_hex() {
        assert!(matches!(Color::hex("#12345"), Err(ColorError::InvalidHex(_))));
        assert!(Color::hex("teal").is_err());
    }

    #[test]
    fn test_deserialize_from_string() {
        let color: Color = serde_json::from_str("\"#ff0000\"").unwrap();
        assert_eq!(color, Color::rgb(1.0, 0.0, 0.0));
    }
}
