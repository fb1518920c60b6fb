//! Keepsake renders personalized song keepsakes: polaroid-style photo cards and handwritten
//! letters, at fixed export sizes, on a CPU raster backend.
//!
//! The pipeline:
//!
//! - Compose a user photo and crop into a [`ProcessedCanvas`] ([`compose`], [`CropCompositor`])
//! - Render a [`RenderRequest`] with a [`FontBook`] and an [`AssetFetcher`]
//! - Export through an [`Exporter`] into a [`DownloadSink`], or shrink for display with
//!   [`downscale_for_preview`]
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod capsule;
pub mod compose;
pub mod config;
pub mod effects;
pub mod export;
pub mod render;
pub mod text;

pub use crate::assets::fetch::{AssetFetcher, HttpFetcher, InMemoryFetcher};
pub use crate::assets::fonts::{Align, FontBook, FontReadiness};
pub use crate::capsule::{Capsule, MessageSource, POLAROID_MESSAGE_LIMIT, ResolvedMessage};
pub use crate::compose::crop::{CropRegion, OUTPUT_SIZE, ProcessedCanvas, compose};
pub use crate::compose::pipeline::{CropCompositor, CropOutcome};
pub use crate::config::{Branding, EngineConfig, FontConfig};
pub use crate::effects::vintage::{FilterConfig, Tint, apply_filter};
pub use crate::export::sink::{DirSink, Download, DownloadSink, InMemorySink};
pub use crate::export::{ExportStatus, Exporter, encode_png, export_filename, sanitize_filename};
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Format, Point, Rect, Rgba8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{KeepsakeError, KeepsakeResult};
pub use crate::foundation::generation::{GenerationCounter, Ticket};
pub use crate::render::bitmap::RenderedBitmap;
pub use crate::render::letter::{LetterBackground, LetterRequest, render_letter};
pub use crate::render::polaroid::{PolaroidRequest, render_polaroid};
pub use crate::render::preview::{PreviewSlot, downscale_for_preview};
pub use crate::render::{ArtStatus, LayoutReport, RenderOutcome, RenderRequest, render};
