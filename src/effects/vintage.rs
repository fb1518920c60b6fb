//! Vintage tone remap and vignette over straight-alpha RGBA8 buffers.

use crate::effects::composite::darken;
use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Color the image is pulled toward, and how strongly.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tint {
    /// Red target.
    pub r: u8,
    /// Green target.
    pub g: u8,
    /// Blue target.
    pub b: u8,
    /// Blend factor toward the target, `0..=1`.
    pub strength: f32,
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            strength: 0.0,
        }
    }
}

/// Per-render filter parameters. Immutable for the duration of a call.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Black-point lift, `0..=60`.
    pub shadow_lift: f32,
    /// Blend toward luminance, `0..=1`.
    pub desaturation: f32,
    /// Contrast around mid-gray; `1.0` is neutral.
    pub contrast_factor: f32,
    /// Grain opacity for hosts that add grain after filtering, `0..=1`.
    pub grain_amount: f32,
    /// Vignette darkness at the rim, `0..=1`.
    pub vignette_strength: f32,
    /// Color tint.
    pub tint: Tint,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::identity()
    }
}

impl FilterConfig {
    /// A config that leaves every pixel unchanged.
    pub fn identity() -> Self {
        Self {
            shadow_lift: 0.0,
            desaturation: 0.0,
            contrast_factor: 1.0,
            grain_amount: 0.0,
            vignette_strength: 0.0,
            tint: Tint::default(),
        }
    }

    /// Faded warm film look.
    pub fn warm() -> Self {
        Self {
            shadow_lift: 28.0,
            desaturation: 0.18,
            contrast_factor: 0.92,
            grain_amount: 0.08,
            vignette_strength: 0.28,
            tint: Tint {
                r: 255,
                g: 220,
                b: 180,
                strength: 0.08,
            },
        }
    }
}

/// Apply the tone remap and vignette to `pixels` in place.
///
/// `pixels` is straight-alpha RGBA8, `width * height * 4` bytes. Alpha is preserved.
pub fn apply_filter(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    config: &FilterConfig,
) -> KeepsakeResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| KeepsakeError::validation("filter buffer size overflow"))?;
    if pixels.len() != expected {
        return Err(KeepsakeError::validation(
            "apply_filter expects pixels matching width*height*4",
        ));
    }

    let lift = config.shadow_lift.clamp(0.0, 60.0);
    let contrast = config.contrast_factor;
    let desat = config.desaturation.clamp(0.0, 1.0);
    let tint_k = config.tint.strength.clamp(0.0, 1.0);
    let tint = [
        f32::from(config.tint.r),
        f32::from(config.tint.g),
        f32::from(config.tint.b),
    ];

    for px in pixels.chunks_exact_mut(4) {
        let mut c = [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])];
        for v in &mut c {
            *v = lift + *v * (255.0 - lift) / 255.0;
            *v = 128.0 + (*v - 128.0) * contrast;
        }
        let l = 0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2];
        for (i, v) in c.iter_mut().enumerate() {
            *v += (l - *v) * desat;
            *v += (tint[i] - *v) * tint_k;
            px[i] = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    apply_vignette(pixels, width, height, config.vignette_strength);
    Ok(())
}

/// Radial darkening: clear inside 30% of the radius, `strength` black at
/// `0.78 * max(width, height)` and beyond.
fn apply_vignette(pixels: &mut [u8], width: u32, height: u32, strength: f32) {
    let strength = strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return;
    }
    let outer = 0.78 * (width.max(height) as f32);
    let inner = 0.3 * outer;
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let t = ((d - inner) / (outer - inner)).clamp(0.0, 1.0);
            let alpha = t * strength;
            if alpha <= 0.0 {
                continue;
            }
            let i = ((y as usize) * (width as usize) + (x as usize)) * 4;
            darken(&mut pixels[i..i + 4], 1.0 - alpha);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vintage.rs"]
mod tests;
