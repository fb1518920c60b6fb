//! PNG export: debounce, font readiness, render, encode, save.

pub mod sink;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use tokio::time::Instant;

use crate::assets::fetch::AssetFetcher;
use crate::assets::fonts::FontBook;
use crate::config::EngineConfig;
use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::render::bitmap::RenderedBitmap;
use crate::render::{RenderRequest, render};
use crate::export::sink::DownloadSink;

/// Result of one [`Exporter::export_png`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    /// Written to this path.
    Saved(PathBuf),
    /// Dropped: too close to the previous accepted call.
    Debounced,
    /// Rendering, encoding or saving failed; the error was logged.
    Failed,
}

/// Drives full-resolution exports into a [`DownloadSink`].
pub struct Exporter<F, S> {
    config: EngineConfig,
    fonts: tokio::sync::Mutex<FontBook>,
    fetcher: F,
    sink: Arc<S>,
    last_accepted: Mutex<Option<Instant>>,
}

impl<F, S> std::fmt::Debug for Exporter<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("export_debounce", &self.config.export_debounce())
            .finish_non_exhaustive()
    }
}

impl<F: AssetFetcher, S: DownloadSink> Exporter<F, S> {
    pub fn new(config: EngineConfig, fonts: FontBook, fetcher: F, sink: S) -> Self {
        Self {
            config,
            fonts: tokio::sync::Mutex::new(fonts),
            fetcher,
            sink: Arc::new(sink),
            last_accepted: Mutex::new(None),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render `request` and save it as a PNG.
    ///
    /// Never fails: problems are logged and reported as [`ExportStatus::Failed`].
    #[tracing::instrument(skip_all, fields(kind = request.kind()))]
    pub async fn export_png(&self, request: &RenderRequest) -> ExportStatus {
        if !self.accept(Instant::now()) {
            tracing::debug!("export ignored, previous one started too recently");
            return ExportStatus::Debounced;
        }
        match self.run(request).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "export saved");
                ExportStatus::Saved(path)
            }
            Err(err) => {
                tracing::error!(%err, "export failed");
                ExportStatus::Failed
            }
        }
    }

    fn accept(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last_accepted.lock() else {
            return false;
        };
        if let Some(prev) = *last
            && now.saturating_duration_since(prev) < self.config.export_debounce()
        {
            return false;
        }
        *last = Some(now);
        true
    }

    async fn run(&self, request: &RenderRequest) -> KeepsakeResult<PathBuf> {
        let outcome = {
            let mut fonts = self.fonts.lock().await;
            fonts.ensure_ready(&self.config.fonts).await;
            render(request, &mut fonts, &self.fetcher, &self.config).await?
        };
        let png = encode_png(&outcome.bitmap)?;
        let filename = export_filename(request, unix_millis());
        let download = self.sink.save(&filename, &png)?;
        if let Some(staging) = download.staging {
            let sink = Arc::clone(&self.sink);
            let delay = self.config.staging_release();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(err) = sink.release(&staging) {
                    tracing::warn!(%err, staging = %staging.display(), "staging release failed");
                }
            });
        }
        Ok(download.path)
    }
}

/// Encode as straight-alpha RGBA PNG at the strongest compression.
pub fn encode_png(bitmap: &RenderedBitmap) -> KeepsakeResult<Vec<u8>> {
    let rgba = bitmap.to_rgba_image()?;
    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive)
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| KeepsakeError::encode(e.to_string()))?;
    if out.is_empty() {
        return Err(KeepsakeError::encode("encoder produced no bytes"));
    }
    Ok(out)
}

/// Reduce `name` to lowercase `[a-z0-9-]`, with single dashes and none at the ends.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if (c.is_whitespace() || c == '-' || c == '_') && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_owned()
}

/// `keepsake-{name}-{kind}.png`, or `keepsake-{millis}.png` when no usable name exists.
pub fn export_filename(request: &RenderRequest, now_millis: u128) -> String {
    match request.display_name().map(sanitize_filename) {
        Some(name) if !name.is_empty() => format!("keepsake-{name}-{}.png", request.kind()),
        _ => format!("keepsake-{now_millis}.png"),
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
