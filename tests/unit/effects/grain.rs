use super::*;
use crate::foundation::core::Rgba8;

fn mean_luma(s: &Surface, region: GrainRegion) -> f64 {
    let d = s.data();
    let mut sum = 0.0;
    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let i = ((y * s.width() + x) * 4) as usize;
            sum += f64::from(d[i]);
        }
    }
    sum / f64::from(region.width * region.height)
}

#[test]
fn speckle_density_matches_probability() {
    let (w, h) = (200u32, 100u32);
    let buf = speckle_buffer(w, h, 0.3, 11);
    let covered = buf.chunks_exact(4).filter(|px| px[3] != 0).count();
    let frac = covered as f64 / f64::from(w * h);
    assert!((frac - 0.3).abs() < 0.02, "frac={frac}");
}

#[test]
fn speckles_are_black_or_white_with_bounded_alpha() {
    let buf = speckle_buffer(64, 64, 1.0, 3);
    let mut whites = 0usize;
    for px in buf.chunks_exact(4) {
        assert!((10..=70).contains(&px[3]), "alpha {}", px[3]);
        if px[0] == px[3] {
            whites += 1;
        } else {
            assert_eq!(&px[..3], &[0, 0, 0]);
        }
    }
    let frac = whites as f64 / 4096.0;
    assert!((frac - 0.5).abs() < 0.05, "white frac={frac}");
}

#[test]
fn zero_density_leaves_target_untouched() {
    let mut s = Surface::new(16, 16).unwrap();
    s.clear(Rgba8::rgb(120, 120, 120));
    let before = s.data().to_vec();
    let full = GrainRegion::full(&s);
    draw_grain(
        &mut s,
        full,
        GrainParams {
            amount: 1.0,
            density: 0.0,
            seed: 1,
        },
    )
    .unwrap();
    assert_eq!(s.data(), before.as_slice());
}

#[test]
fn direct_path_only_touches_region() {
    let mut s = Surface::new(20, 20).unwrap();
    s.clear(Rgba8::rgb(128, 128, 128));
    let region = GrainRegion {
        x: 5,
        y: 5,
        width: 10,
        height: 10,
    };
    draw_grain_with(
        &mut s,
        region,
        GrainParams {
            amount: 1.0,
            density: 1.0,
            seed: 9,
        },
        GrainPath::Direct,
    )
    .unwrap();

    let d = s.data();
    for y in 0..20u32 {
        for x in 0..20u32 {
            let inside = (5..15).contains(&x) && (5..15).contains(&y);
            if !inside {
                let i = ((y * 20 + x) * 4) as usize;
                assert_eq!(&d[i..i + 4], &[128, 128, 128, 255]);
            }
        }
    }
}

#[test]
fn offscreen_and_direct_paths_are_statistically_equivalent() {
    let params = GrainParams {
        amount: 0.8,
        density: 0.5,
        seed: 77,
    };
    let region = GrainRegion {
        x: 0,
        y: 0,
        width: 64,
        height: 64,
    };

    let mut a = Surface::new(64, 64).unwrap();
    a.clear(Rgba8::rgb(128, 128, 128));
    draw_grain_with(&mut a, region, params, GrainPath::Offscreen).unwrap();

    let mut b = Surface::new(64, 64).unwrap();
    b.clear(Rgba8::rgb(128, 128, 128));
    draw_grain_with(&mut b, region, params, GrainPath::Direct).unwrap();

    let (ma, mb) = (mean_luma(&a, region), mean_luma(&b, region));
    assert!((ma - mb).abs() < 3.0, "offscreen={ma} direct={mb}");
    assert_ne!(a.data(), Surface::new(64, 64).unwrap().data());
}

#[test]
fn region_is_clamped_to_surface() {
    let mut s = Surface::new(8, 8).unwrap();
    s.clear(Rgba8::rgb(0, 0, 0));
    let used = draw_grain(
        &mut s,
        GrainRegion {
            x: 6,
            y: 6,
            width: 100,
            height: 100,
        },
        GrainParams {
            amount: 1.0,
            density: 1.0,
            seed: 5,
        },
    )
    .unwrap();
    assert_eq!(used, GrainPath::Offscreen);
}
