//! Gaussian blur for soft shadows.

use crate::foundation::error::{KeepsakeError, KeepsakeResult};

const ONE_Q16: u32 = 1 << 16;

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Blur a premultiplied RGBA8 buffer in place with a separable Gaussian.
///
/// Taps reach `ceil(3 * sigma)` pixels each side and sample clamped at the edges. A non-positive
/// sigma is a no-op.
pub(crate) fn gaussian_blur_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> KeepsakeResult<()> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| KeepsakeError::render("blur buffer size overflow"))?;
    if buf.len() != len {
        return Err(KeepsakeError::render(format!(
            "blur buffer is {} bytes, expected {len} for {width}x{height}",
            buf.len()
        )));
    }
    if !sigma.is_finite() {
        return Err(KeepsakeError::validation("blur sigma must be finite"));
    }
    if sigma <= 0.0 || len == 0 {
        return Ok(());
    }

    let taps = kernel(sigma);
    let mut scratch = vec![0u8; len];
    convolve(buf, &mut scratch, width, height, &taps, Axis::X);
    convolve(&scratch, buf, width, height, &taps, Axis::Y);
    Ok(())
}

/// Q16 weights summing to exactly `1 << 16`.
fn kernel(sigma: f32) -> Vec<u32> {
    let radius = (sigma * 3.0).ceil() as i32;
    let two_s2 = 2.0 * f64::from(sigma).powi(2);
    let raw: Vec<f64> = (-radius..=radius)
        .map(|i| (-f64::from(i * i) / two_s2).exp())
        .collect();
    let total: f64 = raw.iter().sum();

    let mut taps: Vec<u32> = raw
        .iter()
        .map(|w| ((w / total) * f64::from(ONE_Q16)).round() as u32)
        .collect();
    // Rounding drift goes to the center tap.
    let drift = i64::from(ONE_Q16) - taps.iter().map(|&t| i64::from(t)).sum::<i64>();
    let mid = taps.len() / 2;
    taps[mid] = (i64::from(taps[mid]) + drift).clamp(0, i64::from(ONE_Q16)) as u32;
    taps
}

fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, taps: &[u32], axis: Axis) {
    let (w, h) = (width as i32, height as i32);
    let radius = (taps.len() / 2) as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u32; 4];
            for (k, &t) in taps.iter().enumerate() {
                let d = k as i32 - radius;
                let (sx, sy) = match axis {
                    Axis::X => ((x + d).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + d).clamp(0, h - 1)),
                };
                let i = (sy * w + sx) as usize * 4;
                for (a, &v) in acc.iter_mut().zip(&src[i..i + 4]) {
                    *a += t * u32::from(v);
                }
            }
            let o = (y * w + x) as usize * 4;
            for (d, a) in dst[o..o + 4].iter_mut().zip(acc) {
                *d = ((a + ONE_Q16 / 2) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
