//! Integer helpers shared by the pixel effects.

const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer.
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic per-pixel hash for procedural textures.
pub(crate) fn hash_xy(seed: u64, x: u32, y: u32) -> u64 {
    let cell = (u64::from(y) << 32) | u64::from(x);
    mix64(mix64(seed.wrapping_add(GOLDEN)) ^ cell.wrapping_mul(GOLDEN))
}

/// Top 24 bits of a hash as a value in `[0, 1)`.
pub(crate) fn unit_f32(bits: u64) -> f32 {
    (bits >> 40) as f32 / (1u32 << 24) as f32
}

/// `x * y / 255`, rounded.
pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
