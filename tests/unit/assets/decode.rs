use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_photo_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let decoded = decode_photo(&png_bytes(img)).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.as_raw().as_slice(), &[100, 50, 200, 128]);
}

#[test]
fn garbage_and_empty_are_decode_errors() {
    assert!(matches!(
        decode_photo(b"not an image"),
        Err(KeepsakeError::Decode(_))
    ));
    assert!(matches!(decode_photo(&[]), Err(KeepsakeError::Decode(_))));
}

#[test]
fn cover_fit_center_crops_wide_images() {
    // Left third red, middle third green, right third blue.
    let img = image::RgbaImage::from_fn(300, 100, |x, _| match x / 100 {
        0 => image::Rgba([255, 0, 0, 255]),
        1 => image::Rgba([0, 255, 0, 255]),
        _ => image::Rgba([0, 0, 255, 255]),
    });
    let out = cover_fit(&img, 50, 50);
    assert_eq!(out.dimensions(), (50, 50));
    assert_eq!(out.get_pixel(25, 25).0, [0, 255, 0, 255]);
    assert_eq!(out.get_pixel(2, 25).0, [0, 255, 0, 255]);
}

#[test]
fn cover_fit_keeps_exact_windows() {
    let img = image::RgbaImage::from_pixel(80, 40, image::Rgba([7, 7, 7, 255]));
    let out = cover_fit(&img, 40, 40);
    assert_eq!(out.dimensions(), (40, 40));
    assert!(out.pixels().all(|p| p.0 == [7, 7, 7, 255]));
}

#[test]
fn thumbnails_are_square() {
    let img = image::RgbaImage::from_pixel(30, 90, image::Rgba([1, 2, 3, 255]));
    let t = decode_thumbnail(&png_bytes(img), 24).unwrap();
    assert_eq!((t.width(), t.height()), (24, 24));
}
