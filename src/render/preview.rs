//! Display-size previews.

use std::future::Future;
use std::sync::Arc;

use image::imageops::FilterType;
use tokio::sync::watch;

use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::foundation::generation::{GenerationCounter, Ticket};
use crate::render::bitmap::RenderedBitmap;

/// Shrink `bitmap` for display at `display_w × display_h` CSS pixels on a `dpr` screen.
///
/// Halves repeatedly while the source is more than twice the target in both directions, then
/// resizes once to the exact target. Resampling runs on premultiplied pixels.
pub fn downscale_for_preview(
    bitmap: &RenderedBitmap,
    display_w: u32,
    display_h: u32,
    dpr: f32,
) -> KeepsakeResult<RenderedBitmap> {
    if display_w == 0 || display_h == 0 {
        return Err(KeepsakeError::validation("preview size must be non-empty"));
    }
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let tw = ((display_w as f32 * dpr).round() as u32).max(1);
    let th = ((display_h as f32 * dpr).round() as u32).max(1);

    let mut img = image::RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.data.clone())
        .ok_or_else(|| KeepsakeError::render("bitmap byte len does not match dimensions"))?;
    let mut halvings = 0u32;
    while img.width() > tw * 2 && img.height() > th * 2 {
        let (w, h) = ((img.width() / 2).max(1), (img.height() / 2).max(1));
        img = image::imageops::resize(&img, w, h, FilterType::Triangle);
        halvings += 1;
    }
    if img.dimensions() != (tw, th) {
        img = image::imageops::resize(&img, tw, th, FilterType::CatmullRom);
    }
    tracing::debug!(halvings, tw, th, "preview downscaled");

    let (width, height) = img.dimensions();
    Ok(RenderedBitmap {
        width,
        height,
        data: img.into_raw(),
        premultiplied: bitmap.premultiplied,
    })
}

/// The bitmap currently on screen, swapped whole after each successful render.
///
/// Every refresh takes a ticket; a result only lands if no newer refresh started meanwhile.
#[derive(Debug)]
pub struct PreviewSlot {
    generations: GenerationCounter,
    slot: watch::Sender<Option<Arc<RenderedBitmap>>>,
}

impl Default for PreviewSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSlot {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            generations: GenerationCounter::new(),
            slot,
        }
    }

    pub fn current(&self) -> Option<Arc<RenderedBitmap>> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RenderedBitmap>>> {
        self.slot.subscribe()
    }

    /// Start a refresh.
    pub fn begin(&self) -> Ticket {
        self.generations.issue()
    }

    /// Offer a finished bitmap; returns `true` if it became current.
    pub fn offer(&self, ticket: Ticket, bitmap: RenderedBitmap) -> bool {
        let bitmap = Arc::new(bitmap);
        self.slot.send_if_modified(|slot| {
            if self.generations.is_current(ticket) {
                *slot = Some(bitmap);
                true
            } else {
                false
            }
        })
    }

    /// Run `render` under a fresh ticket and swap its result in if it is still the latest.
    pub async fn refresh<Fut>(&self, render: Fut) -> bool
    where
        Fut: Future<Output = KeepsakeResult<RenderedBitmap>>,
    {
        let ticket = self.begin();
        match render.await {
            Ok(bitmap) => self.offer(ticket, bitmap),
            Err(err) => {
                tracing::warn!(%err, "preview render failed, keeping previous preview");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
