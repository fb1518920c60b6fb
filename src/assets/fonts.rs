//! Font faces, measurement and glyph drawing.
//!
//! A [`FontBook`] holds up to one face per [`FontRole`]. Shaping and measurement go through
//! parley; missing faces degrade to [`ApproxMetrics`] so layout still works and glyph drawing
//! is skipped.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use crate::config::FontConfig;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::render::surface::Painter;
use crate::text::bold::Segment;
use crate::text::measure::{ApproxMetrics, FontRole, TextMeasure, TextStyle};

const ROLES: [FontRole; 3] = [FontRole::Regular, FontRole::Bold, FontRole::Display];

/// Horizontal anchor for a single line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Left edge of a run `width` wide anchored at `x`.
    pub fn start_x(self, x: f64, width: f64) -> f64 {
        match self {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        }
    }
}

/// Which roles have a real face behind them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontReadiness {
    /// Every role has its own face.
    Ready,
    /// Some roles fall back; `missing` lists them.
    Partial { missing: Vec<FontRole> },
    /// No face at all: measurement is approximate and glyphs are not drawn.
    MetricsOnly,
}

struct Face {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Registered faces plus reusable parley contexts.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<FontRole, Face>,
    attempted: Vec<FontRole>,
    warned_missing: bool,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut roles: Vec<_> = self.faces.keys().copied().collect();
        roles.sort_by_key(|r| *r as u8);
        f.debug_struct("FontBook")
            .field("faces", &roles)
            .finish_non_exhaustive()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::metrics_only()
    }
}

impl FontBook {
    /// A book with no faces; every measurement uses [`ApproxMetrics`].
    pub fn metrics_only() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            attempted: Vec::new(),
            warned_missing: false,
        }
    }

    /// Load every configured face, best effort.
    pub async fn load(config: &FontConfig) -> Self {
        let mut book = Self::metrics_only();
        book.ensure_ready(config).await;
        book
    }

    /// Register `bytes` as the face for `role`.
    pub fn register(&mut self, role: FontRole, bytes: Vec<u8>) -> KeepsakeResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            KeepsakeError::validation(format!("no font families in {role:?} font bytes"))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KeepsakeError::validation("registered font family has no name"))?
            .to_string();
        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        tracing::debug!(?role, %family, "font registered");
        self.faces.insert(role, Face { family, data });
        Ok(())
    }

    /// Try to load any configured role that has no face yet, then report readiness.
    ///
    /// Each configured path is attempted once per book; failures are logged, never returned.
    pub async fn ensure_ready(&mut self, config: &FontConfig) -> FontReadiness {
        for role in ROLES {
            if self.faces.contains_key(&role) || self.attempted.contains(&role) {
                continue;
            }
            let Some(path) = config_path(config, role) else {
                continue;
            };
            self.attempted.push(role);
            if let Err(err) = self.load_role(role, path).await {
                tracing::warn!(?role, path = %path.display(), %err, "font unavailable, falling back");
            }
        }
        let readiness = self.readiness();
        if readiness != FontReadiness::Ready {
            tracing::debug!(?readiness, "fonts not fully ready");
        }
        readiness
    }

    async fn load_role(&mut self, role: FontRole, path: &Path) -> KeepsakeResult<()> {
        let bytes = tokio::fs::read(path).await?;
        self.register(role, bytes)
    }

    /// Current readiness without loading anything.
    pub fn readiness(&self) -> FontReadiness {
        if self.faces.is_empty() {
            return FontReadiness::MetricsOnly;
        }
        let missing: Vec<_> = ROLES
            .into_iter()
            .filter(|r| !self.faces.contains_key(r))
            .collect();
        if missing.is_empty() {
            FontReadiness::Ready
        } else {
            FontReadiness::Partial { missing }
        }
    }

    /// Face used for `role`: its own, else the regular face, else any face.
    fn face_key(&self, role: FontRole) -> Option<FontRole> {
        [role, FontRole::Regular, FontRole::Bold, FontRole::Display]
            .into_iter()
            .find(|r| self.faces.contains_key(r))
    }

    fn layout_line(&mut self, text: &str, key: FontRole, size: f32) -> Option<parley::Layout<()>> {
        let family = self.faces.get(&key)?.family.clone();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }

    /// Draw one line of text with its baseline at `origin.y`, anchored horizontally by `align`.
    ///
    /// Returns the advance width. Glyphs are skipped when no face is available.
    pub fn draw_line(
        &mut self,
        painter: &mut Painter<'_>,
        text: &str,
        style: TextStyle,
        origin: Point,
        align: Align,
        color: Rgba8,
    ) -> f32 {
        let width = self.measure(text, style);
        let x = align.start_x(origin.x, f64::from(width));
        self.draw_run(painter, text, style, Point::new(x, origin.y), color);
        width
    }

    /// Draw a styled line left to right from `origin`, each segment in its own weight.
    pub fn draw_segments(
        &mut self,
        painter: &mut Painter<'_>,
        segments: &[Segment],
        base: TextStyle,
        origin: Point,
        align: Align,
        color: Rgba8,
    ) -> f32 {
        let width = crate::text::wrap::styled_width(self, segments, base);
        let starts = self.segment_starts(segments, base, origin.x, align);
        for (seg, x) in segments.iter().zip(starts) {
            let style = base.for_segment(seg.bold);
            self.draw_run(painter, &seg.text, style, Point::new(x, origin.y), color);
        }
        width
    }

    /// Left edge of each segment: the anchor plus the advances of all earlier segments,
    /// trailing spaces included.
    pub(crate) fn segment_starts(
        &mut self,
        segments: &[Segment],
        base: TextStyle,
        x: f64,
        align: Align,
    ) -> Vec<f64> {
        let width = crate::text::wrap::styled_width(self, segments, base);
        let mut x = align.start_x(x, f64::from(width));
        segments
            .iter()
            .map(|seg| {
                let start = x;
                x += f64::from(self.measure(&seg.text, base.for_segment(seg.bold)));
                start
            })
            .collect()
    }

    fn draw_run(
        &mut self,
        painter: &mut Painter<'_>,
        text: &str,
        style: TextStyle,
        origin: Point,
        color: Rgba8,
    ) {
        if text.trim().is_empty() {
            return;
        }
        let Some(key) = self.face_key(style.role) else {
            if !self.warned_missing {
                tracing::warn!("no font faces loaded, text glyphs are skipped");
                self.warned_missing = true;
            }
            return;
        };
        let Some(layout) = self.layout_line(text, key, style.size) else {
            return;
        };
        let Some(face) = self.faces.get(&key) else {
            return;
        };
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                let glyphs = run
                    .glyphs()
                    .map(|g| {
                        let glyph = vello_cpu::Glyph {
                            id: g.id,
                            x: origin.x as f32 + x + g.x,
                            y: origin.y as f32 - g.y,
                        };
                        x += g.advance;
                        glyph
                    })
                    .collect::<Vec<_>>();
                painter.fill_glyphs(&face.data, run.run().font_size(), glyphs.into_iter(), color);
            }
        }
    }
}

impl TextMeasure for FontBook {
    fn measure(&mut self, text: &str, style: TextStyle) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match self.face_key(style.role) {
            Some(key) => self
                .layout_line(text, key, style.size)
                // `width()` stops at the last ink; segments joined at a space need the advance.
                .map(|l| l.full_width())
                .unwrap_or_else(|| ApproxMetrics.measure(text, style)),
            None => ApproxMetrics.measure(text, style),
        }
    }
}

fn config_path(config: &FontConfig, role: FontRole) -> Option<&Path> {
    match role {
        FontRole::Regular => config.regular.as_deref(),
        FontRole::Bold => config.bold.as_deref(),
        FontRole::Display => config.display.as_deref(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
