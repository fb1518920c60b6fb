//! Polaroid card template: tilted photo card on a warm background.

use std::sync::Arc;

use kurbo::{Circle, Ellipse, RoundedRect, Shape};

use crate::assets::fetch::AssetFetcher;
use crate::assets::fonts::{Align, FontBook};
use crate::compose::crop::ProcessedCanvas;
use crate::config::{Branding, EngineConfig};
use crate::effects::blur::gaussian_blur_in_place;
use crate::effects::grain::{GrainParams, GrainRegion, draw_grain};
use crate::effects::vintage::FilterConfig;
use crate::foundation::core::{Affine, BezPath, Canvas, Format, Point, Rect, Rgba8};
use crate::foundation::error::KeepsakeResult;
use crate::render::layout::{CardMetrics, HeaderStyle, PolaroidLayout, palette};
use crate::render::surface::{ImagePaint, Painter, Surface};
use crate::render::{LayoutReport, RenderOutcome, baseline_in_box, fetch_album_art};
use crate::text::bold::Segment;
use crate::text::fit::{FitParams, fit_text, line_height, max_lines};
use crate::text::measure::TextStyle;
use crate::text::wrap::{truncate, wrap};

/// Everything the polaroid template needs.
#[derive(Clone, Debug)]
pub struct PolaroidRequest {
    pub processed_image: Arc<ProcessedCanvas>,
    pub track_name: String,
    pub artist_name: String,
    pub album_art_url: Option<String>,
    pub message: String,
    pub receiver_name: String,
    pub format: Format,
    /// Accepted for hosts that pre-filter the photo; the renderer draws the photo unfiltered.
    pub filter: FilterConfig,
}

const SHADOW_SCALE: f64 = 0.25;
const MESSAGE_GAP: f64 = 14.0;

struct FittedMessage {
    size: f32,
    start: f32,
    lines: Vec<String>,
    top: f64,
    limit: f64,
    overflowed: bool,
}

impl FittedMessage {
    fn bottom(&self) -> f64 {
        self.top + self.lines.len() as f64 * f64::from(line_height(self.size))
    }
}

struct SongRow {
    track: String,
    artist: String,
}

/// Render the polaroid card. Album art failures fall back to a placeholder circle.
#[tracing::instrument(skip_all, fields(format = request.format.as_str()))]
pub async fn render_polaroid<F: AssetFetcher>(
    request: &PolaroidRequest,
    fonts: &mut FontBook,
    fetcher: &F,
    config: &EngineConfig,
) -> KeepsakeResult<RenderOutcome> {
    let layout = PolaroidLayout::for_format(request.format);
    let (art, album_art) = fetch_album_art(
        fetcher,
        request.album_art_url.as_deref(),
        layout.song.art_diameter as u32,
    )
    .await;
    if request.filter != FilterConfig::identity() {
        tracing::debug!("filter config present; photo is drawn as processed");
    }

    let photo = ImagePaint::from_rgba_image(request.processed_image.image())?;
    let mut surface = Surface::for_canvas(layout.canvas)?;
    paint_background(&mut surface, config.grain_seed)?;
    let shadow = card_shadow(&layout.card, layout.canvas)?;

    let message = fit_message(fonts, &request.message, &layout);
    let song = song_row(fonts, request, &layout);
    let name = display_name(&request.receiver_name);

    surface.draw(|p| {
        draw_header(p, fonts, &layout, name);
        p.draw_image(&shadow, layout.canvas.rect());
        p.with_transform(card_transform(&layout.card), |p| {
            draw_card(p, fonts, &layout, &photo, art.as_ref(), &message, &song, name);
        });
        if layout.footer.is_some() {
            draw_footer(p, fonts, &layout, &config.branding);
        }
        draw_watermark(p, fonts, &layout, &config.branding);
        Ok(())
    })?;

    let report = LayoutReport {
        canvas: Some(layout.canvas),
        initial_size: message.start,
        message_size: message.size,
        text_top: message.top,
        text_bottom: message.bottom(),
        text_limit: message.limit,
        overflowed: message.overflowed,
        lines: message
            .lines
            .iter()
            .map(|l| vec![Segment::normal(l.clone())])
            .collect(),
        album_art,
        song_text: vec![song.track, song.artist],
        background_fallback: false,
    };
    tracing::debug!(
        size = report.message_size,
        lines = report.lines.len(),
        ?album_art,
        "polaroid rendered"
    );
    Ok(RenderOutcome {
        bitmap: surface.into_bitmap(),
        report,
    })
}

fn display_name(receiver: &str) -> &str {
    match receiver.trim() {
        "" => "friend",
        name => name,
    }
}

/// Warm radial gradient plus a faint grain pass.
fn paint_background(surface: &mut Surface, seed: u64) -> KeepsakeResult<()> {
    let (w, h) = (surface.width(), surface.height());
    let (cx, cy) = (f64::from(w) / 2.0, f64::from(h) * 0.42);
    let radius = f64::from(w).hypot(f64::from(h)) * 0.6;
    let (inner, outer) = (palette::BG_INNER, palette::BG_OUTER);
    let data = surface.data_mut();
    for y in 0..h {
        for x in 0..w {
            let d = (f64::from(x) + 0.5 - cx).hypot(f64::from(y) + 0.5 - cy);
            let t = (d / radius).clamp(0.0, 1.0);
            let t = t * t * (3.0 - 2.0 * t);
            let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            let i = ((y as usize) * (w as usize) + (x as usize)) * 4;
            data[i..i + 4].copy_from_slice(&[
                lerp(inner.r, outer.r),
                lerp(inner.g, outer.g),
                lerp(inner.b, outer.b),
                255,
            ]);
        }
    }
    let region = GrainRegion::full(surface);
    draw_grain(
        surface,
        region,
        GrainParams {
            amount: 0.06,
            density: 0.5,
            seed,
        },
    )?;
    Ok(())
}

fn card_transform(card: &CardMetrics) -> Affine {
    Affine::rotate_about(card.tilt_deg.to_radians(), card.rect().center())
        * Affine::translate((card.x, card.top))
}

/// Soft drop shadow, rendered small and blurred, as a full-canvas paint.
fn card_shadow(card: &CardMetrics, canvas: Canvas) -> KeepsakeResult<ImagePaint> {
    let sw = ((f64::from(canvas.width) * SHADOW_SCALE).ceil() as u32).max(1);
    let sh = ((f64::from(canvas.height) * SHADOW_SCALE).ceil() as u32).max(1);
    let mut small = Surface::new(sw, sh)?;
    let shape = RoundedRect::from_rect(
        Rect::new(0.0, 0.0, card.width, card.height).inflate(6.0, 6.0),
        card.radius + 6.0,
    );
    let t = Affine::scale(SHADOW_SCALE)
        * Affine::translate((0.0, 18.0))
        * card_transform(card);
    small.draw(|p| {
        p.with_transform(t, |p| {
            p.fill_shape(&shape, Rgba8::rgba(40, 24, 10, 96));
        });
        Ok(())
    })?;
    gaussian_blur_in_place(small.data_mut(), sw, sh, 5.0)?;
    Ok(small.snapshot())
}

fn fit_message(fonts: &mut FontBook, text: &str, layout: &PolaroidLayout) -> FittedMessage {
    let strip = layout.card.strip_rect();
    let top = strip.y0 + 60.0;
    let limit = strip.y1 - layout.song.art_diameter - MESSAGE_GAP;
    let available = (limit - top) as f32;
    let width = strip.width() as f32;
    let start = layout.tiers.start_size(text.chars().count());

    let fitted = fit_text(
        FitParams {
            start,
            floor: layout.floor,
            step: layout.step,
            available,
        },
        |size| {
            let lines = wrap(fonts, text, TextStyle::regular(size), width);
            let height = lines.len() as f32 * line_height(size);
            (lines, height)
        },
    );
    let mut lines = fitted.layout;
    if fitted.overflowed {
        let keep = max_lines(available, fitted.size);
        if lines.len() > keep {
            lines.truncate(keep);
            if let Some(last) = lines.last_mut() {
                let cut = format!("{}…", last.trim_end());
                *last = truncate(fonts, &cut, TextStyle::regular(fitted.size), width);
            }
        }
    }
    FittedMessage {
        size: fitted.size,
        start: fitted.start,
        lines,
        top,
        limit,
        overflowed: fitted.overflowed,
    }
}

fn song_row(fonts: &mut FontBook, request: &PolaroidRequest, layout: &PolaroidLayout) -> SongRow {
    let strip = layout.card.strip_rect();
    let budget = (strip.width() - layout.song.art_diameter - layout.song.gap) as f32;
    SongRow {
        track: truncate(
            fonts,
            request.track_name.trim(),
            TextStyle::bold(layout.song.track_size),
            budget,
        ),
        artist: truncate(
            fonts,
            request.artist_name.trim(),
            TextStyle::regular(layout.song.artist_size),
            budget,
        ),
    }
}

fn draw_header(p: &mut Painter<'_>, fonts: &mut FontBook, layout: &PolaroidLayout, name: &str) {
    let cx = f64::from(layout.canvas.width) / 2.0;
    let first = format!("Hey {name},");
    let second = "this one's for you";
    let (b1, b2, s1, s2) = match layout.header {
        HeaderStyle::Compact {
            first_baseline,
            second_baseline,
            first_size,
            second_size,
        }
        | HeaderStyle::Decorated {
            first_baseline,
            second_baseline,
            first_size,
            second_size,
            ..
        } => (first_baseline, second_baseline, first_size, second_size),
    };
    let w1 = fonts.draw_line(
        p,
        &first,
        TextStyle::display(s1),
        Point::new(cx, b1),
        Align::Center,
        palette::INK,
    );
    let w2 = fonts.draw_line(
        p,
        second,
        TextStyle::display(s2),
        Point::new(cx, b2),
        Align::Center,
        palette::INK_SOFT,
    );

    if let HeaderStyle::Decorated { underline_y, .. } = layout.header {
        let half = f64::from(w1.max(w2)) / 2.0 + 24.0;
        p.dashed_line(
            cx - half,
            cx + half,
            underline_y,
            18.0,
            10.0,
            3.0,
            palette::ACCENT.with_alpha(0.7),
        );
        for (x, y, deg, scale) in [
            (150.0, 150.0, -15.0, 1.0),
            (930.0, 175.0, 12.0, 0.8),
            (118.0, 300.0, 8.0, 0.7),
            (962.0, 322.0, -10.0, 1.1),
        ] {
            let t = Affine::translate((x, y)) * Affine::rotate(f64::to_radians(deg));
            p.with_transform(t, |p| draw_note(p, scale, palette::ACCENT.with_alpha(0.55)));
        }
    }
}

/// Eighth note with its head centered on the origin.
fn draw_note(p: &mut Painter<'_>, s: f64, color: Rgba8) {
    p.fill_shape(&Ellipse::new((0.0, 0.0), (14.0 * s, 10.0 * s), -0.35), color);
    p.fill_rect(Rect::new(10.0 * s, -56.0 * s, 14.0 * s, -2.0 * s), color);
    let mut flag = BezPath::new();
    flag.move_to((14.0 * s, -56.0 * s));
    flag.curve_to((28.0 * s, -46.0 * s), (32.0 * s, -34.0 * s), (24.0 * s, -22.0 * s));
    flag.line_to((22.0 * s, -24.0 * s));
    flag.curve_to((26.0 * s, -34.0 * s), (22.0 * s, -42.0 * s), (14.0 * s, -46.0 * s));
    flag.close_path();
    p.fill_path(&flag, color);
}

#[allow(clippy::too_many_arguments)]
fn draw_card(
    p: &mut Painter<'_>,
    fonts: &mut FontBook,
    layout: &PolaroidLayout,
    photo: &ImagePaint,
    art: Option<&ImagePaint>,
    message: &FittedMessage,
    song: &SongRow,
    name: &str,
) {
    let card = &layout.card;
    let body = RoundedRect::from_rect(Rect::new(0.0, 0.0, card.width, card.height), card.radius);
    p.fill_shape(&body, palette::CARD);

    let photo_rect = card.photo_rect();
    p.with_clip(&RoundedRect::from_rect(photo_rect, 4.0).to_path(0.1), |p| {
        p.draw_image(photo, photo_rect);
    });

    let strip = card.strip_rect();
    let cx = strip.center().x;
    fonts.draw_line(
        p,
        &format!("Hey, {name}"),
        TextStyle::display(layout.greeting_size),
        Point::new(cx, strip.y0 + 40.0),
        Align::Center,
        palette::INK,
    );

    let lh = f64::from(line_height(message.size));
    for (i, line) in message.lines.iter().enumerate() {
        let baseline = baseline_in_box(message.top + i as f64 * lh, lh, message.size);
        fonts.draw_line(
            p,
            line,
            TextStyle::regular(message.size),
            Point::new(cx, baseline),
            Align::Center,
            palette::INK,
        );
    }

    let d = layout.song.art_diameter;
    let art_center = Point::new(strip.x0 + d / 2.0, strip.y1 - d / 2.0);
    let circle = Circle::new(art_center, d / 2.0);
    match art {
        Some(art) => {
            let square = Rect::from_center_size(art_center, (d, d));
            p.with_clip(&circle.to_path(0.1), |p| p.draw_image_cover(art, square));
        }
        None => p.fill_shape(&circle, palette::PLACEHOLDER),
    }

    let text_x = strip.x0 + d + layout.song.gap;
    fonts.draw_line(
        p,
        &song.track,
        TextStyle::bold(layout.song.track_size),
        Point::new(text_x, art_center.y - 6.0),
        Align::Left,
        palette::INK,
    );
    fonts.draw_line(
        p,
        &song.artist,
        TextStyle::regular(layout.song.artist_size),
        Point::new(text_x, art_center.y + 24.0),
        Align::Left,
        palette::INK_SOFT,
    );
}

fn draw_footer(p: &mut Painter<'_>, fonts: &mut FontBook, layout: &PolaroidLayout, branding: &Branding) {
    let Some(footer) = layout.footer else {
        return;
    };
    let cx = f64::from(layout.canvas.width) / 2.0;
    fonts.draw_line(
        p,
        &branding.wordmark,
        TextStyle::display(footer.wordmark_size),
        Point::new(cx, footer.wordmark_baseline),
        Align::Center,
        palette::INK,
    );
    fonts.draw_line(
        p,
        &branding.tagline,
        TextStyle::regular(footer.tagline_size),
        Point::new(cx, footer.tagline_baseline),
        Align::Center,
        palette::INK_SOFT,
    );
    for y in [footer.rule_y, footer.rule_y + footer.rule_gap] {
        p.line(
            Point::new(cx - 300.0, y),
            Point::new(cx + 300.0, y),
            footer.rule_width,
            palette::INK_SOFT,
        );
    }
}

fn draw_watermark(p: &mut Painter<'_>, fonts: &mut FontBook, layout: &PolaroidLayout, branding: &Branding) {
    let canvas = layout.canvas;
    fonts.draw_line(
        p,
        &branding.watermark,
        TextStyle::regular(layout.watermark_size),
        Point::new(f64::from(canvas.width) - 36.0, f64::from(canvas.height) - 30.0),
        Align::Right,
        palette::INK_SOFT.with_alpha(0.7),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/polaroid.rs"]
mod tests;
