use image::imageops::FilterType;

use crate::effects::grain::{GrainParams, GrainRegion, draw_grain};
use crate::effects::vintage::{FilterConfig, apply_filter};
use crate::foundation::error::KeepsakeResult;
use crate::render::surface::Surface;

/// Side of the square processed canvas.
pub const OUTPUT_SIZE: u32 = 756;

/// Crop rectangle in source pixel space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert a cropper rectangle given in `0..=1` fractions of the image size.
    pub fn from_normalized(nx: f64, ny: f64, nw: f64, nh: f64, img_w: u32, img_h: u32) -> Self {
        let (w, h) = (f64::from(img_w), f64::from(img_h));
        Self::new(nx * w, ny * h, nw * w, nh * h)
    }

    /// Largest centered square, the cropper's initial selection.
    pub fn centered_square(img_w: u32, img_h: u32) -> Self {
        let side = f64::from(img_w.min(img_h));
        Self::new(
            (f64::from(img_w) - side) / 2.0,
            (f64::from(img_h) - side) / 2.0,
            side,
            side,
        )
    }

    /// Finite with a positive area.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Whole-pixel bounds `(x, y, w, h)` inside an `img_w × img_h` image, or `None` if nothing
    /// of the region overlaps it.
    pub fn pixel_bounds(&self, img_w: u32, img_h: u32) -> Option<(u32, u32, u32, u32)> {
        if !self.is_valid() {
            return None;
        }
        let x0 = self.x.max(0.0).floor();
        let y0 = self.y.max(0.0).floor();
        let x1 = (self.x + self.width).min(f64::from(img_w)).ceil();
        let y1 = (self.y + self.height).min(f64::from(img_h)).ceil();
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// The square photo the polaroid renderer reads. Straight-alpha RGBA, always
/// [`OUTPUT_SIZE`] on each side.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedCanvas {
    image: image::RgbaImage,
}

impl ProcessedCanvas {
    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn into_image(self) -> image::RgbaImage {
        self.image
    }

    /// A filtered copy: tone remap and vignette, then grain at `config.grain_amount`.
    pub fn vintage(&self, config: &FilterConfig, seed: u64) -> KeepsakeResult<Self> {
        let mut image = self.image.clone();
        let (w, h) = image.dimensions();
        apply_filter(&mut image, w, h, config)?;
        if config.grain_amount <= 0.0 {
            return Ok(Self { image });
        }
        let mut surface = Surface::from_rgba_image(&image)?;
        let region = GrainRegion::full(&surface);
        draw_grain(
            &mut surface,
            region,
            GrainParams {
                amount: config.grain_amount,
                density: 0.35,
                seed,
            },
        )?;
        Ok(Self {
            image: surface.into_bitmap().to_rgba_image()?,
        })
    }
}

/// Draw `crop` of `source` scaled to fill the output square exactly.
///
/// The region is clamped to the image; an empty, negative or non-finite region yields `None`.
pub fn compose(source: &image::RgbaImage, crop: CropRegion) -> Option<ProcessedCanvas> {
    let (x, y, w, h) = crop.pixel_bounds(source.width(), source.height())?;
    let cropped = image::imageops::crop_imm(source, x, y, w, h).to_image();
    let image = if (w, h) == (OUTPUT_SIZE, OUTPUT_SIZE) {
        cropped
    } else {
        image::imageops::resize(&cropped, OUTPUT_SIZE, OUTPUT_SIZE, FilterType::Lanczos3)
    };
    Some(ProcessedCanvas { image })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/crop.rs"]
mod tests;
