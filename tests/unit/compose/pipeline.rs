use std::io::Cursor;

use super::*;
use crate::compose::crop::OUTPUT_SIZE;

fn photo(color: [u8; 4]) -> Arc<[u8]> {
    let img = image::RgbaImage::from_pixel(40, 30, image::Rgba(color));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf.into()
}

fn center(c: &ProcessedCanvas) -> [u8; 4] {
    c.image().get_pixel(OUTPUT_SIZE / 2, OUTPUT_SIZE / 2).0
}

#[tokio::test(start_paused = true)]
async fn publishes_after_debounce() {
    let comp = CropCompositor::new(Duration::from_millis(180));
    let mut rx = comp.subscribe();
    assert!(comp.current().is_none());

    let out = comp
        .request(photo([9, 8, 7, 255]), CropRegion::centered_square(40, 30))
        .await;
    assert!(matches!(out, CropOutcome::Published(_)));
    assert!(rx.has_changed().unwrap());
    let canvas = rx.borrow_and_update().clone().unwrap();
    assert_eq!(center(&canvas), [9, 8, 7, 255]);
}

#[tokio::test(start_paused = true)]
async fn latest_request_wins() {
    let comp = CropCompositor::new(Duration::from_millis(180));
    let crop = CropRegion::centered_square(40, 30);
    let (a, b) = tokio::join!(
        comp.request(photo([255, 0, 0, 255]), crop),
        comp.request(photo([0, 0, 255, 255]), crop),
    );
    assert_eq!(a, CropOutcome::Superseded);
    assert!(matches!(b, CropOutcome::Published(_)));
    assert_eq!(center(&comp.current().unwrap()), [0, 0, 255, 255]);
}

#[tokio::test(start_paused = true)]
async fn failures_keep_previous_canvas() {
    let comp = CropCompositor::new(Duration::from_millis(180));
    let crop = CropRegion::centered_square(40, 30);
    comp.request(photo([1, 2, 3, 255]), crop).await;

    let bad_bytes = comp.request(Arc::from(&b"nope"[..]), crop).await;
    assert_eq!(bad_bytes, CropOutcome::Failed);
    let empty_crop = comp
        .request(photo([200, 200, 200, 255]), CropRegion::new(0.0, 0.0, 0.0, 0.0))
        .await;
    assert_eq!(empty_crop, CropOutcome::Failed);

    assert_eq!(center(&comp.current().unwrap()), [1, 2, 3, 255]);
}

#[tokio::test(start_paused = true)]
async fn clones_share_one_slot() {
    let comp = CropCompositor::from_config(&EngineConfig::default());
    let other = comp.clone();
    other
        .request(photo([5, 5, 5, 255]), CropRegion::centered_square(40, 30))
        .await;
    assert!(comp.current().is_some());
}
