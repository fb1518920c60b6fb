use super::*;

fn quadrants(side: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(side, side, |x, y| {
        let left = x < side / 2;
        let top = y < side / 2;
        match (left, top) {
            (true, true) => image::Rgba([255, 0, 0, 255]),
            (false, true) => image::Rgba([0, 255, 0, 255]),
            (true, false) => image::Rgba([0, 0, 255, 255]),
            (false, false) => image::Rgba([255, 255, 255, 255]),
        }
    })
}

#[test]
fn output_is_always_square_at_output_size() {
    let src = quadrants(200);
    let out = compose(&src, CropRegion::new(10.0, 10.0, 50.0, 50.0)).unwrap();
    assert_eq!(out.image().dimensions(), (OUTPUT_SIZE, OUTPUT_SIZE));
    assert_eq!(out.size(), OUTPUT_SIZE);
}

#[test]
fn crop_selects_the_requested_region() {
    let src = quadrants(200);
    // Top-right quadrant only.
    let out = compose(&src, CropRegion::new(100.0, 0.0, 100.0, 100.0)).unwrap();
    let c = out.image().get_pixel(OUTPUT_SIZE / 2, OUTPUT_SIZE / 2);
    assert_eq!(c.0, [0, 255, 0, 255]);
}

#[test]
fn invalid_regions_yield_none() {
    let src = quadrants(64);
    assert!(compose(&src, CropRegion::new(0.0, 0.0, 0.0, 10.0)).is_none());
    assert!(compose(&src, CropRegion::new(0.0, 0.0, 10.0, -1.0)).is_none());
    assert!(compose(&src, CropRegion::new(f64::NAN, 0.0, 10.0, 10.0)).is_none());
    assert!(compose(&src, CropRegion::new(500.0, 500.0, 10.0, 10.0)).is_none());
}

#[test]
fn regions_hanging_off_the_image_are_clamped() {
    let src = quadrants(64);
    let out = compose(&src, CropRegion::new(-20.0, -20.0, 200.0, 200.0)).unwrap();
    assert_eq!(out.image().dimensions(), (OUTPUT_SIZE, OUTPUT_SIZE));
}

#[test]
fn normalized_and_centered_regions() {
    let r = CropRegion::from_normalized(0.25, 0.5, 0.5, 0.25, 400, 800);
    assert_eq!(r, CropRegion::new(100.0, 400.0, 200.0, 200.0));

    let sq = CropRegion::centered_square(400, 300);
    assert_eq!(sq, CropRegion::new(50.0, 0.0, 300.0, 300.0));
    assert_eq!(sq.pixel_bounds(400, 300), Some((50, 0, 300, 300)));
}

#[test]
fn vintage_identity_without_grain_is_a_copy() {
    let out = compose(&quadrants(32), CropRegion::new(0.0, 0.0, 32.0, 32.0)).unwrap();
    let same = out.vintage(&FilterConfig::identity(), 1).unwrap();
    assert_eq!(same, out);
}

#[test]
fn vintage_warm_changes_pixels_and_keeps_size() {
    let out = compose(&quadrants(32), CropRegion::new(0.0, 0.0, 32.0, 32.0)).unwrap();
    let warm = out.vintage(&FilterConfig::warm(), 7).unwrap();
    assert_eq!(warm.size(), OUTPUT_SIZE);
    assert_ne!(warm, out);
}
