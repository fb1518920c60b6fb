//! Speckle grain overlay for paper and photo texture.
//!
//! Each pixel of the region becomes, with probability `density`, a pure white or pure black
//! speck with alpha drawn uniformly from `10..=70` (out of 255). The speckle layer is then
//! composited at global opacity `amount`. Randomness comes from a seeded per-pixel hash, so a
//! given seed always yields the same texture.

use crate::effects::composite::over_region_in_place;
use crate::foundation::core::Rect;
use crate::foundation::error::KeepsakeResult;
use crate::foundation::math::{hash_xy, mix64, unit_f32};
use crate::render::surface::{ImagePaint, Surface};
use kurbo::Shape;

const MIN_ALPHA: u64 = 10;
const MAX_ALPHA: u64 = 70;

/// Pixel rectangle on the target surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrainRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl GrainRegion {
    /// Region covering the whole surface.
    pub fn full(surface: &Surface) -> Self {
        Self {
            x: 0,
            y: 0,
            width: surface.width(),
            height: surface.height(),
        }
    }

    fn clamped_to(self, width: u32, height: u32) -> Option<Self> {
        let x1 = self.x.saturating_add(self.width).min(width);
        let y1 = self.y.saturating_add(self.height).min(height);
        if self.x >= x1 || self.y >= y1 {
            return None;
        }
        Some(Self {
            x: self.x,
            y: self.y,
            width: x1 - self.x,
            height: y1 - self.y,
        })
    }
}

/// Grain strength, coverage and seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrainParams {
    /// Global opacity of the speckle layer, `0..=1`.
    pub amount: f32,
    /// Probability that a pixel receives a speck, `0..=1`.
    pub density: f32,
    /// Texture seed.
    pub seed: u64,
}

/// How the speckle layer reaches the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrainPath {
    /// Rendered into an offscreen pixmap and composited through the vector context.
    Offscreen,
    /// Composited straight into the target pixel buffer.
    Direct,
}

/// Premultiplied RGBA8 speckle buffer of `width * height` pixels.
pub fn speckle_buffer(width: u32, height: u32, density: f32, seed: u64) -> Vec<u8> {
    let density = density.clamp(0.0, 1.0);
    let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
    if density <= 0.0 {
        return bytes;
    }
    for y in 0..height {
        for x in 0..width {
            let h = hash_xy(seed, x, y);
            if unit_f32(h) >= density {
                continue;
            }
            let h2 = mix64(h ^ 0x9E37_79B9_7F4A_7C15);
            let a = (MIN_ALPHA + (h2 >> 8) % (MAX_ALPHA - MIN_ALPHA + 1)) as u8;
            let white = h2 & 1 == 0;
            let c = if white { a } else { 0 };
            let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[c, c, c, a]);
        }
    }
    bytes
}

/// Draw grain into `region`, preferring the offscreen path and falling back to direct
/// compositing if the offscreen layer cannot be built.
///
/// Pixels outside `region` are never touched. Returns the path that was used.
pub fn draw_grain(
    surface: &mut Surface,
    region: GrainRegion,
    params: GrainParams,
) -> KeepsakeResult<GrainPath> {
    match draw_grain_with(surface, region, params, GrainPath::Offscreen) {
        Ok(()) => Ok(GrainPath::Offscreen),
        Err(err) => {
            tracing::debug!(%err, "offscreen grain unavailable, compositing directly");
            draw_grain_with(surface, region, params, GrainPath::Direct)?;
            Ok(GrainPath::Direct)
        }
    }
}

/// Draw grain through an explicit path.
pub fn draw_grain_with(
    surface: &mut Surface,
    region: GrainRegion,
    params: GrainParams,
    path: GrainPath,
) -> KeepsakeResult<()> {
    let amount = params.amount.clamp(0.0, 1.0);
    if amount <= 0.0 || params.density <= 0.0 {
        return Ok(());
    }
    let Some(region) = region.clamped_to(surface.width(), surface.height()) else {
        return Ok(());
    };
    let speckle = speckle_buffer(region.width, region.height, params.density, params.seed);

    match path {
        GrainPath::Offscreen => {
            let layer = ImagePaint::from_premul(&speckle, region.width, region.height)?;
            let dest = Rect::new(
                f64::from(region.x),
                f64::from(region.y),
                f64::from(region.x + region.width),
                f64::from(region.y + region.height),
            );
            surface.draw(|p| {
                p.with_clip(&dest.to_path(0.1), |p| {
                    p.with_opacity(amount, |p| p.draw_image(&layer, dest));
                });
                Ok(())
            })
        }
        GrainPath::Direct => {
            let (w, h) = (surface.width(), surface.height());
            over_region_in_place(
                surface.data_mut(),
                w,
                h,
                &speckle,
                region.width,
                region.height,
                i64::from(region.x),
                i64::from(region.y),
                amount,
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
