use super::*;

#[test]
fn mul_div255_matches_rounded_division() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 200), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(100, 128), 50);
}

#[test]
fn hash_xy_is_deterministic_and_seed_sensitive() {
    assert_eq!(hash_xy(7, 3, 9), hash_xy(7, 3, 9));
    assert_ne!(hash_xy(7, 3, 9), hash_xy(8, 3, 9));
    assert_ne!(hash_xy(7, 3, 9), hash_xy(7, 9, 3));
}

#[test]
fn unit_f32_stays_in_half_open_range() {
    for i in 0..1000u32 {
        let u = unit_f32(hash_xy(1, i, i / 7));
        assert!((0.0..1.0).contains(&u));
    }
    assert_eq!(unit_f32(0), 0.0);
    assert!(unit_f32(u64::MAX) < 1.0);
}

#[test]
fn unit_f32_is_roughly_uniform() {
    let n = 20_000u32;
    let below_half = (0..n)
        .filter(|&i| unit_f32(hash_xy(42, i % 200, i / 200)) < 0.5)
        .count();
    let frac = below_half as f64 / f64::from(n);
    assert!((frac - 0.5).abs() < 0.02, "frac={frac}");
}
