// src/render/raster.rs
//
// Pixmap-backed surface. Masks, image tips and the demo canvas are all
// rasters; brushes stamp into them with tiny-skia paths.

use thiserror::Error;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, FilterQuality, Mask, MaskType, Paint, Path, Pixmap, PixmapPaint,
    PremultipliedColorU8, Rect, Stroke, Transform,
};

use crate::models::Color;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("cannot allocate a {width}x{height} raster")]
    Size { width: u32, height: u32 },
    #[error("expected {expected} bytes of RGBA8 data, got {actual}")]
    Data { expected: usize, actual: usize },
}

impl From<Color> for tiny_skia::Color {
    fn from(color: Color) -> Self {
        tiny_skia::Color::from_rgba(
            color.r.clamp(0.0, 1.0),
            color.g.clamp(0.0, 1.0),
            color.b.clamp(0.0, 1.0),
            color.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

/// What a primitive deposits where it covers a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ink {
    /// Source-over with a straight-alpha color.
    Paint(Color),
    /// Removes this fraction of the destination alpha.
    Erase(f32),
}

impl Ink {
    fn color(self) -> tiny_skia::Color {
        match self {
            Ink::Paint(color) => color.into(),
            Ink::Erase(strength) => Color::BLACK.with_alpha(strength).into(),
        }
    }

    fn blend_mode(self) -> BlendMode {
        match self {
            Ink::Paint(_) => BlendMode::SourceOver,
            Ink::Erase(_) => BlendMode::DestinationOut,
        }
    }

    fn to_paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.color());
        paint.blend_mode = self.blend_mode();
        paint.anti_alias = true;
        paint
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixmap: Pixmap,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::Size { width, height })?;
        Ok(Self { pixmap })
    }

    /// Builds a raster from straight-alpha RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RasterError> {
        let mut raster = Self::new(width, height)?;
        let expected = raster.pixmap.data().len();
        if bytes.len() != expected {
            return Err(RasterError::Data {
                expected,
                actual: bytes.len(),
            });
        }
        for (dst, p) in raster.pixmap.pixels_mut().iter_mut().zip(bytes.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
        }
        Ok(raster)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixels(&self) -> &[PremultipliedColorU8] {
        self.pixmap.pixels()
    }

    pub fn pixels_mut(&mut self) -> &mut [PremultipliedColorU8] {
        self.pixmap.pixels_mut()
    }

    /// Premultiplied pixel in [0, 1], None outside the raster.
    pub fn pixel(&self, x: i64, y: i64) -> Option<[f32; 4]> {
        if x < 0 || y < 0 {
            return None;
        }
        let p = self.pixmap.pixel(x as u32, y as u32)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()].map(|c| c as f32 / 255.0))
    }

    pub fn alpha(&self, x: i64, y: i64) -> f32 {
        self.pixel(x, y).map_or(0.0, |p| p[3])
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    pub fn background(&mut self, color: Color) {
        self.pixmap.fill(color.into());
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Even-odd fill of `path` mapped through `transform`.
    pub fn fill_path(&mut self, path: &Path, ink: Ink, transform: Transform) {
        self.pixmap
            .fill_path(path, &ink.to_paint(), FillRule::EvenOdd, transform, None);
    }

    /// Butt-ended outline of `path`. `weight` is in the path's own units.
    pub fn stroke_path(&mut self, path: &Path, weight: f32, ink: Ink, transform: Transform) {
        if weight <= 0.0 {
            return;
        }
        let stroke = Stroke {
            width: weight,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(path, &ink.to_paint(), &stroke, transform, None);
    }

    /// Draws `image` through `transform`, which maps image pixel coordinates
    /// onto this raster. The image alpha scales the ink.
    pub fn draw_image(&mut self, image: &Raster, transform: Transform, ink: Ink) {
        let Some(mut tinted) = Pixmap::new(image.width(), image.height()) else {
            return;
        };
        let Some(rect) = Rect::from_xywh(0.0, 0.0, image.width() as f32, image.height() as f32) else {
            return;
        };
        let mask = Mask::from_pixmap(image.pixmap.as_ref(), MaskType::Alpha);
        let mut paint = Paint::default();
        paint.set_color(ink.color());
        tinted.fill_rect(rect, &paint, Transform::identity(), Some(&mask));

        let blit = PixmapPaint {
            opacity: 1.0,
            blend_mode: ink.blend_mode(),
            quality: FilterQuality::Bilinear,
        };
        self.pixmap.draw_pixmap(0, 0, tinted.as_ref(), &blit, transform, None);
    }

    /// Source-over of another raster at the origin.
    pub fn composite_over(&mut self, source: &Raster) {
        self.pixmap.draw_pixmap(
            0,
            0,
            source.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }
}
