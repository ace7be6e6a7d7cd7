// src/brush/tip_images.rs
//
// Registry of image tips. Sources are registered when image brushes are
// added and decoded on demand; decoded tips are stored as white rasters
// whose alpha is the darkness of the source, so the stamp color tints them.

use nannou::image::{self, ImageError, RgbaImage};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::{Raster, RasterError};

#[derive(Debug, Error)]
pub enum TipImageError {
    #[error("could not decode tip image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("tip image {name} has no usable pixels: {error}")]
    Empty {
        name: String,
        #[source]
        error: RasterError,
    },
}

#[derive(Debug, Default)]
pub struct TipImages {
    tips: HashMap<String, Option<Raster>>,
    warned: HashSet<String>,
}

impl TipImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `source` as needed. Already loaded tips are left alone.
    pub fn register(&mut self, source: &str) {
        self.tips.entry(source.to_string()).or_insert(None);
    }

    pub fn insert(&mut self, source: &str, image: &RgbaImage) -> Result<(), TipImageError> {
        let tint = white_tint(image).map_err(|error| TipImageError::Empty {
            name: source.to_string(),
            error,
        })?;
        self.tips.insert(source.to_string(), Some(tint));
        Ok(())
    }

    pub fn get(&self, source: &str) -> Option<&Raster> {
        self.tips.get(source).and_then(Option::as_ref)
    }

    pub fn is_loaded(&self, source: &str) -> bool {
        self.get(source).is_some()
    }

    /// Registered sources still waiting to be decoded.
    pub fn pending(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .tips
            .iter()
            .filter(|(_, image)| image.is_none())
            .map(|(source, _)| source.clone())
            .collect();
        pending.sort();
        pending
    }

    /// Decodes every pending source relative to `base_dir` and returns how
    /// many were loaded.
    pub fn load_all<P: AsRef<Path>>(&mut self, base_dir: P) -> Result<usize, TipImageError> {
        let mut loaded = 0;
        for source in self.pending() {
            let path = base_dir.as_ref().join(&source);
            let decoded = image::open(&path)
                .map_err(|source| TipImageError::Decode {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            log::debug!("loaded tip image {} ({}x{})", path.display(), decoded.width(), decoded.height());
            self.insert(&source, &decoded)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Logs a missing tip the first time it is asked for. Returns true when
    /// the warning was emitted.
    pub fn warn_missing(&mut self, source: &str) -> bool {
        if self.is_loaded(source) || !self.warned.insert(source.to_string()) {
            return false;
        }
        log::warn!("image tip `{}` was never loaded; its strokes are skipped", source);
        true
    }
}

/// White raster with alpha = 1 - mean(rgb).
pub fn white_tint(image: &RgbaImage) -> Result<Raster, RasterError> {
    let bytes: Vec<u8> = image
        .pixels()
        .flat_map(|p| {
            let average = (p[0] as u32 + p[1] as u32 + p[2] as u32) / 3;
            [255, 255, 255, 255 - average as u8]
        })
        .collect();
    Raster::from_rgba8(image.width(), image.height(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::image::Rgba;

    #[test]
    fn test_white_tint_inverts_luminance() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        let tint = white_tint(&image).unwrap();
        assert_eq!(tint.alpha(0, 0), 1.0);
        assert_eq!(tint.alpha(1, 0), 0.0);
        let p = tint.pixel(0, 0).unwrap();
        assert_eq!(p[0], 1.0);
    }

    #[test]
    fn test_register_then_insert() {
        let mut images = TipImages::new();
        images.register("a.png");
        images.register("b.png");
        assert_eq!(images.pending(), vec!["a.png".to_string(), "b.png".to_string()]);
        images.insert("a.png", &RgbaImage::new(1, 1)).unwrap();
        assert!(images.is_loaded("a.png"));
        assert_eq!(images.pending(), vec!["b.png".to_string()]);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let mut images = TipImages::new();
        images.register("blank.png");
        let result = images.insert("blank.png", &RgbaImage::new(0, 0));
        assert!(matches!(result, Err(TipImageError::Empty { .. })));
        assert!(!images.is_loaded("blank.png"));
    }

    #[test]
    fn test_missing_tip_warns_once() {
        let mut images = TipImages::new();
        images.register("c.png");
        assert!(images.warn_missing("c.png"));
        assert!(!images.warn_missing("c.png"));
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        let mut images = TipImages::new();
        images.register("not-there.png");
        let result = images.load_all("/nonexistent-dir");
        assert!(matches!(result, Err(TipImageError::Decode { .. })));
    }
}
