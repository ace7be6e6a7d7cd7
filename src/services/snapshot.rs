// src/services/snapshot.rs
// Snapshot writes the painted canvas to numbered image files in an output
// directory, as PNG or JPEG.

use nannou::image::{self, codecs::jpeg::JpegEncoder, DynamicImage, RgbaImage};
use std::{
    fs::{create_dir_all, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::render::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    /// Quality 1..100
    Jpeg(u8),
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg(_) => "jpg",
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("raster of {width}x{height} does not match its pixel buffer")]
    Size { width: u32, height: u32 },
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] image::ImageError),
}

pub struct Snapshot {
    output_dir: PathBuf,
    format: OutputFormat,
    frame_number: u32,
}

impl Snapshot {
    pub fn new<P: AsRef<Path>>(output_dir: P, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            format,
            frame_number: 0,
        }
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    /// Saves `raster` as the next numbered frame and returns its path.
    pub fn save(&mut self, raster: &Raster) -> Result<PathBuf, SnapshotError> {
        create_dir_all(&self.output_dir).map_err(|source| SnapshotError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let (width, height) = (raster.width(), raster.height());
        let buffer = RgbaImage::from_raw(width, height, raster.to_rgba8())
            .ok_or(SnapshotError::Size { width, height })?;

        let filename = self.output_dir.join(format!(
            "frame{:05}.{}",
            self.frame_number,
            self.format.extension()
        ));

        match self.format {
            OutputFormat::Png => buffer.save(&filename)?,
            OutputFormat::Jpeg(quality) => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(buffer).to_rgb8();
                let file = File::create(&filename).map_err(|source| SnapshotError::Io {
                    path: filename.clone(),
                    source,
                })?;
                let mut writer = BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, quality).encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ColorType::Rgb8,
                )?;
            }
        }

        log::info!("saved {}", filename.display());
        self.frame_number += 1;
        Ok(filename)
    }
}
