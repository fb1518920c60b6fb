//! Debounced, generation-guarded crop recomposition.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::assets::decode::decode_photo;
use crate::compose::crop::{CropRegion, ProcessedCanvas, compose};
use crate::config::EngineConfig;
use crate::foundation::generation::{GenerationCounter, Ticket};

/// What happened to one [`CropCompositor::request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropOutcome {
    /// The new canvas is now current.
    Published(Ticket),
    /// A newer request arrived first; nothing changed.
    Superseded,
    /// Decode failed or the crop was empty; the previous canvas stays.
    Failed,
}

struct Inner {
    generations: GenerationCounter,
    debounce: Duration,
    slot: watch::Sender<Option<Arc<ProcessedCanvas>>>,
}

/// Recomposes the processed canvas as the crop changes. Only the latest request's result is
/// ever published.
#[derive(Clone)]
pub struct CropCompositor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CropCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropCompositor")
            .field("debounce", &self.inner.debounce)
            .field("latest", &self.inner.generations.latest())
            .finish_non_exhaustive()
    }
}

impl CropCompositor {
    pub fn new(debounce: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                generations: GenerationCounter::new(),
                debounce,
                slot,
            }),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.crop_debounce())
    }

    /// The most recently published canvas.
    pub fn current(&self) -> Option<Arc<ProcessedCanvas>> {
        self.inner.slot.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ProcessedCanvas>>> {
        self.inner.slot.subscribe()
    }

    /// Recompose `source` under `crop` once the debounce window passes without a newer
    /// request.
    pub async fn request(&self, source: Arc<[u8]>, crop: CropRegion) -> CropOutcome {
        let inner = &self.inner;
        let ticket = inner.generations.issue();
        tokio::time::sleep(inner.debounce).await;
        if !inner.generations.is_current(ticket) {
            return CropOutcome::Superseded;
        }

        let composed = tokio::task::spawn_blocking(move || {
            let image = decode_photo(&source)?;
            Ok::<_, crate::KeepsakeError>(compose(&image, crop))
        })
        .await;
        let canvas = match composed {
            Ok(Ok(Some(canvas))) => Arc::new(canvas),
            Ok(Ok(None)) => {
                tracing::debug!(?crop, "empty crop region, keeping previous canvas");
                return CropOutcome::Failed;
            }
            Ok(Err(err)) => {
                tracing::warn!(%err, "photo decode failed, keeping previous canvas");
                return CropOutcome::Failed;
            }
            Err(err) => {
                tracing::warn!(%err, "compose task failed, keeping previous canvas");
                return CropOutcome::Failed;
            }
        };

        let published = inner.slot.send_if_modified(|slot| {
            if inner.generations.is_current(ticket) {
                *slot = Some(canvas);
                true
            } else {
                false
            }
        });
        if published {
            CropOutcome::Published(ticket)
        } else {
            CropOutcome::Superseded
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pipeline.rs"]
mod tests;
