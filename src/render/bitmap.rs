use crate::effects::composite::unpremultiply_rgba8_in_place;
use crate::foundation::core::Canvas;
use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// A finished render as RGBA8 pixels.
///
/// Renderers produce premultiplied pixels; the `premultiplied` flag makes that explicit at API
/// boundaries. Treat the value as immutable once returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl RenderedBitmap {
    pub(crate) fn from_premul(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Bitmap dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Straight-alpha copy suitable for encoding or resizing.
    pub fn to_rgba_image(&self) -> KeepsakeResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| KeepsakeError::render("bitmap byte len does not match dimensions"))
    }

    /// Straight-alpha RGBA at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut px);
        }
        Some(px)
    }
}
