use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::foundation::math::mul_div255_u8;

/// Source-over a tightly packed `src` block onto `dst` at pixel offset `(x, y)`, scaled by
/// a global `opacity`.
///
/// Both buffers are premultiplied RGBA8; parts of `src` falling outside `dst` are skipped.
/// Opacity is quantized to a byte once for the whole block.
#[allow(clippy::too_many_arguments)]
pub(crate) fn over_region_in_place(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &[u8],
    src_width: u32,
    src_height: u32,
    x: i64,
    y: i64,
    opacity: f32,
) -> KeepsakeResult<()> {
    let expected_dst = (dst_width as usize) * (dst_height as usize) * 4;
    let expected_src = (src_width as usize) * (src_height as usize) * 4;
    if dst.len() != expected_dst || src.len() != expected_src {
        return Err(KeepsakeError::render(
            "over_region_in_place expects buffers matching width*height*4",
        ));
    }
    let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
    if op == 0 {
        return Ok(());
    }

    for sy in 0..src_height {
        let dy = y + i64::from(sy);
        if dy < 0 || dy >= i64::from(dst_height) {
            continue;
        }
        for sx in 0..src_width {
            let dx = x + i64::from(sx);
            if dx < 0 || dx >= i64::from(dst_width) {
                continue;
            }
            let si = ((sy as usize) * (src_width as usize) + (sx as usize)) * 4;
            let di = ((dy as usize) * (dst_width as usize) + (dx as usize)) * 4;
            blend_over(&mut dst[di..di + 4], &src[si..si + 4], op);
        }
    }
    Ok(())
}

/// `src * op + dst * (1 - src_alpha * op)`, all channels premultiplied.
fn blend_over(dst: &mut [u8], src: &[u8], op: u16) {
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return;
    }
    let keep = 255 - u16::from(sa);
    for (c, d) in dst.iter_mut().enumerate() {
        let s = if c == 3 { sa } else { mul_div255_u8(u16::from(src[c]), op) };
        *d = s.saturating_add(mul_div255_u8(u16::from(*d), keep));
    }
}

/// Multiply the color channels of one pixel by `factor` in `[0, 1]`; never lightens.
pub(crate) fn darken(px: &mut [u8], factor: f32) {
    let f = factor.clamp(0.0, 1.0);
    if f >= 1.0 {
        return;
    }
    for c in px.iter_mut().take(3) {
        *c = ((*c as f32) * f).round().clamp(0.0, 255.0) as u8;
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = (((*c as u32) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
