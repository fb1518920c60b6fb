use anyhow::Context;
use image::imageops::FilterType;

use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::render::surface::ImagePaint;

/// Decode any format `image` understands into straight-alpha RGBA8.
pub fn decode_photo(bytes: &[u8]) -> KeepsakeResult<image::RgbaImage> {
    if bytes.is_empty() {
        return Err(KeepsakeError::decode("empty image payload"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| KeepsakeError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(KeepsakeError::decode("image has no pixels"));
    }
    Ok(rgba)
}

/// Scale `img` to cover exactly `width × height`, center-cropping the overflow.
pub fn cover_fit(img: &image::RgbaImage, width: u32, height: u32) -> image::RgbaImage {
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 || width == 0 || height == 0 {
        return image::RgbaImage::new(width, height);
    }
    let scale = (f64::from(width) / f64::from(iw)).max(f64::from(height) / f64::from(ih));
    // Source window that maps onto the target once scaled.
    let cw = ((f64::from(width) / scale).round() as u32).clamp(1, iw);
    let ch = ((f64::from(height) / scale).round() as u32).clamp(1, ih);
    let cx = (iw - cw) / 2;
    let cy = (ih - ch) / 2;
    let window = image::imageops::crop_imm(img, cx, cy, cw, ch).to_image();
    if (cw, ch) == (width, height) {
        return window;
    }
    image::imageops::resize(&window, width, height, FilterType::Lanczos3)
}

/// Decode, center-crop to a square and scale to `side` pixels: the album-art thumbnail.
pub fn decode_thumbnail(bytes: &[u8], side: u32) -> KeepsakeResult<ImagePaint> {
    let rgba = decode_photo(bytes)?;
    ImagePaint::from_rgba_image(&cover_fit(&rgba, side, side))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
