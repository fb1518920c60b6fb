//! Template renderers and the surfaces they draw on.

pub mod bitmap;
pub mod layout;
pub mod letter;
pub mod polaroid;
pub mod preview;
pub mod surface;

use crate::assets::decode::decode_thumbnail;
use crate::assets::fetch::AssetFetcher;
use crate::assets::fonts::FontBook;
use crate::config::EngineConfig;
use crate::foundation::core::{Canvas, Format};
use crate::foundation::error::KeepsakeResult;
use crate::render::bitmap::RenderedBitmap;
use crate::render::letter::{LetterRequest, render_letter};
use crate::render::polaroid::{PolaroidRequest, render_polaroid};
use crate::render::surface::ImagePaint;
use crate::text::wrap::StyledLine;

/// One keepsake to render.
#[derive(Clone, Debug)]
pub enum RenderRequest {
    Polaroid(PolaroidRequest),
    Letter(LetterRequest),
}

impl RenderRequest {
    /// Template name used in file names and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderRequest::Polaroid(_) => "polaroid",
            RenderRequest::Letter(_) => "letter",
        }
    }

    /// Canvas the request renders at. Letters ignore the requested format.
    pub fn canvas(&self) -> Canvas {
        match self {
            RenderRequest::Polaroid(p) => p.format.canvas(),
            RenderRequest::Letter(_) => Format::Ig.canvas(),
        }
    }

    /// Name to put in the export file name: receiver first, then sender.
    pub fn display_name(&self) -> Option<&str> {
        let (receiver, sender) = match self {
            RenderRequest::Polaroid(p) => (p.receiver_name.as_str(), None),
            RenderRequest::Letter(l) => (l.receiver_name.as_str(), Some(l.sender_name.as_str())),
        };
        [Some(receiver), sender]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// How the album art slot was filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArtStatus {
    /// Fetched and drawn.
    Drawn,
    /// A URL was given but the fetch or decode failed.
    Placeholder,
    /// No URL.
    #[default]
    Absent,
}

/// Layout decisions made by a renderer.
///
/// Vertical positions are in the template's drawing space (card-local for the polaroid message).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutReport {
    pub canvas: Option<Canvas>,
    /// Tier size the auto-fit started at.
    pub initial_size: f32,
    /// Size the message was drawn at.
    pub message_size: f32,
    /// Message lines as drawn.
    pub lines: Vec<StyledLine>,
    /// Top of the message block.
    pub text_top: f64,
    /// Bottom of everything auto-fitted (message plus sign-off for letters).
    pub text_bottom: f64,
    /// Boundary the text block must stay above.
    pub text_limit: f64,
    /// The floor size was reached without fitting; trailing lines were dropped.
    pub overflowed: bool,
    pub album_art: ArtStatus,
    /// Song texts as drawn (after truncation).
    pub song_text: Vec<String>,
    /// The letter background fell back to the flat cream fill.
    pub background_fallback: bool,
}

/// A finished render.
#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub bitmap: RenderedBitmap,
    pub report: LayoutReport,
}

/// Render either template.
pub async fn render<F: AssetFetcher>(
    request: &RenderRequest,
    fonts: &mut FontBook,
    fetcher: &F,
    config: &EngineConfig,
) -> KeepsakeResult<RenderOutcome> {
    match request {
        RenderRequest::Polaroid(p) => render_polaroid(p, fonts, fetcher, config).await,
        RenderRequest::Letter(l) => render_letter(l, fonts, fetcher, config).await,
    }
}

/// Fetch and decode album art as a `side`-pixel square, logging failures.
pub(crate) async fn fetch_album_art<F: AssetFetcher>(
    fetcher: &F,
    url: Option<&str>,
    side: u32,
) -> (Option<ImagePaint>, ArtStatus) {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return (None, ArtStatus::Absent);
    };
    let art = match fetcher.fetch(url).await {
        Ok(bytes) => decode_thumbnail(&bytes, side),
        Err(err) => Err(err),
    };
    match art {
        Ok(paint) => (Some(paint), ArtStatus::Drawn),
        Err(err) => {
            tracing::warn!(%url, %err, "album art unavailable, drawing placeholder");
            (None, ArtStatus::Placeholder)
        }
    }
}

/// Baseline for a line box of `line_height` starting at `top`.
pub(crate) fn baseline_in_box(top: f64, line_height: f64, size: f32) -> f64 {
    top + line_height / 2.0 + f64::from(size) * 0.35
}
