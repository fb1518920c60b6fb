use std::time::Duration;

use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RenderedBitmap {
    RenderedBitmap {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn lands_on_exact_dpr_scaled_target() {
    let src = solid(1080, 1350, [200, 100, 50, 255]);
    let out = downscale_for_preview(&src, 216, 270, 2.0).unwrap();
    assert_eq!((out.width, out.height), (432, 540));
    assert_eq!(out.data.len(), 432 * 540 * 4);
    assert!(out.premultiplied);
    assert_eq!(out.pixel(100, 100), Some([200, 100, 50, 255]));
}

#[test]
fn odd_targets_and_upscales_are_exact() {
    let src = solid(1080, 1920, [10, 20, 30, 255]);
    let out = downscale_for_preview(&src, 123, 211, 1.0).unwrap();
    assert_eq!((out.width, out.height), (123, 211));

    let small = solid(10, 10, [0, 0, 0, 255]);
    let up = downscale_for_preview(&small, 20, 20, 1.0).unwrap();
    assert_eq!((up.width, up.height), (20, 20));
}

#[test]
fn bad_inputs() {
    let src = solid(8, 8, [0, 0, 0, 255]);
    assert!(downscale_for_preview(&src, 0, 8, 1.0).is_err());
    let ok = downscale_for_preview(&src, 4, 4, f32::NAN).unwrap();
    assert_eq!((ok.width, ok.height), (4, 4));
}

#[test]
fn halving_keeps_thin_lines_visible() {
    // One-pixel dark rows every 8px on white.
    let (w, h) = (512u32, 512u32);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for _ in 0..w {
            let v = if y % 8 == 0 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let src = RenderedBitmap {
        width: w,
        height: h,
        data,
        premultiplied: true,
    };
    let out = downscale_for_preview(&src, 64, 64, 1.0).unwrap();
    let mean: u32 = out.data.chunks_exact(4).map(|p| u32::from(p[0])).sum::<u32>()
        / (out.width * out.height);
    // Average coverage is preserved: 7/8 white.
    assert!((200..=240).contains(&mean), "mean {mean}");
}

#[test]
fn stale_offers_are_discarded() {
    let slot = PreviewSlot::new();
    let old = slot.begin();
    let new = slot.begin();
    assert!(slot.offer(new, solid(1, 1, [1, 1, 1, 255])));
    assert!(!slot.offer(old, solid(1, 1, [2, 2, 2, 255])));
    assert_eq!(slot.current().unwrap().data, vec![1, 1, 1, 255]);
}

#[tokio::test(start_paused = true)]
async fn slower_older_refresh_does_not_overwrite_newer() {
    let slot = PreviewSlot::new();
    let mut rx = slot.subscribe();
    let slow = slot.refresh(async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(solid(1, 1, [9, 9, 9, 255]))
    });
    let fast = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        slot.refresh(async { Ok(solid(1, 1, [7, 7, 7, 255])) }).await
    };
    let (slow_won, fast_won) = tokio::join!(slow, fast);
    assert!(!slow_won);
    assert!(fast_won);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().data, vec![7, 7, 7, 255]);
}

#[tokio::test]
async fn failed_refresh_keeps_previous() {
    let slot = PreviewSlot::default();
    assert!(slot.refresh(async { Ok(solid(1, 1, [3, 3, 3, 255])) }).await);
    assert!(
        !slot
            .refresh(async { Err(KeepsakeError::render("boom")) })
            .await
    );
    assert_eq!(slot.current().unwrap().data, vec![3, 3, 3, 255]);
}
