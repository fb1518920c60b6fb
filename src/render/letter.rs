//! Letter template: full-bleed background, handwritten greeting, body and song footer.

use kurbo::{RoundedRect, Shape};

use crate::assets::decode::{cover_fit, decode_photo};
use crate::assets::fetch::AssetFetcher;
use crate::assets::fonts::{Align, FontBook};
use crate::config::{Branding, EngineConfig};
use crate::foundation::core::{Format, Point, Rect, Rgba8};
use crate::foundation::error::KeepsakeResult;
use crate::render::layout::{LetterLayout, palette};
use crate::render::surface::{ImagePaint, Painter, Surface};
use crate::render::{LayoutReport, RenderOutcome, baseline_in_box, fetch_album_art};
use crate::text::fit::{FitParams, fit_text, line_height, max_lines};
use crate::text::measure::TextStyle;
use crate::text::wrap::{StyledLine, truncate, truncate_styled, wrap_bold};

/// Where the letter background comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterBackground {
    /// Preset or user image, fetched and cover-fitted.
    ImageUrl(String),
    /// `#rgb` / `#rrggbb` flat fill.
    Color(String),
}

impl LetterBackground {
    /// Hex strings become colors, anything else a URL.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if Rgba8::is_hex(s) {
            LetterBackground::Color(s.to_owned())
        } else {
            LetterBackground::ImageUrl(s.to_owned())
        }
    }
}

/// Everything the letter template needs.
#[derive(Clone, Debug)]
pub struct LetterRequest {
    pub background: LetterBackground,
    pub message: String,
    pub track_name: String,
    pub artist_name: String,
    pub album_art_url: Option<String>,
    pub receiver_name: String,
    pub sign_off: String,
    pub sender_name: String,
    /// Ignored: letters always render at the portrait size.
    pub format: Format,
}

const WASH_ALPHA: f32 = 0.55;

struct FittedBody {
    size: f32,
    start: f32,
    lines: Vec<StyledLine>,
    top: f64,
    limit: f64,
    overflowed: bool,
    sign_off: Option<String>,
    sender: Option<String>,
}

impl FittedBody {
    fn line_height(&self) -> f64 {
        f64::from(line_height(self.size))
    }

    fn body_bottom(&self) -> f64 {
        self.top + self.lines.len() as f64 * self.line_height()
    }

    fn bottom(&self, sender_scale: f32) -> f64 {
        self.body_bottom()
            + f64::from(sign_off_height(
                self.size,
                sender_scale,
                self.sign_off.is_some(),
                self.sender.is_some(),
            ))
    }
}

/// Vertical space of the sign-off block: a blank line, the sign-off, the sender.
fn sign_off_height(size: f32, sender_scale: f32, sign_off: bool, sender: bool) -> f32 {
    if !sign_off && !sender {
        return 0.0;
    }
    let mut h = line_height(size);
    if sign_off {
        h += line_height(size);
    }
    if sender {
        h += line_height(size * sender_scale);
    }
    h
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

/// Render the letter. Background and album-art failures fall back to flat fills.
#[tracing::instrument(skip_all, fields(requested = request.format.as_str()))]
pub async fn render_letter<F: AssetFetcher>(
    request: &LetterRequest,
    fonts: &mut FontBook,
    fetcher: &F,
    config: &EngineConfig,
) -> KeepsakeResult<RenderOutcome> {
    let layout = LetterLayout::default();
    if request.format != Format::Ig {
        tracing::debug!("letters render at the portrait size only");
    }
    let (mut surface, background_fallback) = background(request, fetcher, &layout).await?;
    let (art, album_art) = fetch_album_art(
        fetcher,
        request.album_art_url.as_deref(),
        layout.thumb as u32,
    )
    .await;

    let greeting = non_blank(&request.receiver_name).map(|n| format!("Dear {n},"));
    let body = fit_body(fonts, request, &layout, greeting.is_some());
    let with_thumb = request
        .album_art_url
        .as_deref()
        .is_some_and(|u| !u.trim().is_empty());
    let song = song_lines(fonts, request, &layout, with_thumb);

    surface.draw(|p| {
        p.fill_rect(layout.canvas.rect(), Rgba8::rgb(255, 255, 255).with_alpha(WASH_ALPHA));
        if let Some(greeting) = &greeting {
            fonts.draw_line(
                p,
                greeting,
                TextStyle::display(layout.greeting_size),
                Point::new(layout.margin, layout.greeting_baseline),
                Align::Left,
                palette::INK,
            );
        }
        draw_body(p, fonts, &layout, &body);
        draw_footer(p, fonts, &layout, &song, with_thumb.then_some(art.as_ref()));
        draw_watermark(p, fonts, &layout, &config.branding);
        Ok(())
    })?;

    let report = LayoutReport {
        canvas: Some(layout.canvas),
        initial_size: body.start,
        message_size: body.size,
        text_top: body.top,
        text_bottom: body.bottom(layout.sender_scale),
        text_limit: body.limit,
        overflowed: body.overflowed,
        lines: body.lines,
        album_art,
        song_text: song,
        background_fallback,
    };
    tracing::debug!(
        size = report.message_size,
        start = report.initial_size,
        lines = report.lines.len(),
        "letter rendered"
    );
    Ok(RenderOutcome {
        bitmap: surface.into_bitmap(),
        report,
    })
}

async fn background<F: AssetFetcher>(
    request: &LetterRequest,
    fetcher: &F,
    layout: &LetterLayout,
) -> KeepsakeResult<(Surface, bool)> {
    let (w, h) = (layout.canvas.width, layout.canvas.height);
    let loaded = match &request.background {
        LetterBackground::Color(hex) => Rgba8::from_hex(hex).and_then(|c| {
            let mut s = Surface::new(w, h)?;
            s.clear(Rgba8 { a: 255, ..c });
            Ok(s)
        }),
        LetterBackground::ImageUrl(url) => match fetcher.fetch(url).await {
            Ok(bytes) => decode_photo(&bytes)
                .and_then(|img| Surface::from_rgba_image(&cover_fit(&img, w, h))),
            Err(err) => Err(err),
        },
    };
    match loaded {
        Ok(surface) => Ok((surface, false)),
        Err(err) => {
            tracing::warn!(%err, "letter background unavailable, using flat cream");
            let mut s = Surface::new(w, h)?;
            s.clear(palette::CREAM);
            Ok((s, true))
        }
    }
}

fn fit_body(
    fonts: &mut FontBook,
    request: &LetterRequest,
    layout: &LetterLayout,
    has_greeting: bool,
) -> FittedBody {
    let top = if has_greeting {
        layout.body_top
    } else {
        layout.body_top_bare
    };
    let limit = layout.text_limit();
    let available = (limit - top) as f32;
    let width = layout.text_width() as f32;
    let sign_off = non_blank(&request.sign_off);
    let sender = non_blank(&request.sender_name);
    let (has_sign_off, has_sender) = (sign_off.is_some(), sender.is_some());
    let text = request.message.as_str();
    let start = layout.tiers.start_size(text.chars().count());

    let fitted = fit_text(
        FitParams {
            start,
            floor: layout.floor,
            step: layout.step,
            available,
        },
        |size| {
            let lines = wrap_bold(fonts, text, width, TextStyle::regular(size));
            let height = lines.len() as f32 * line_height(size)
                + sign_off_height(size, layout.sender_scale, has_sign_off, has_sender);
            (lines, height)
        },
    );

    let mut lines = fitted.layout;
    if fitted.overflowed {
        let reserved = sign_off_height(fitted.size, layout.sender_scale, has_sign_off, has_sender);
        let keep = max_lines(available - reserved, fitted.size);
        if lines.len() > keep {
            lines.truncate(keep);
            if let Some(last) = lines.pop() {
                lines.push(truncate_styled(fonts, &last, TextStyle::regular(fitted.size), width));
            }
        }
    }
    FittedBody {
        size: fitted.size,
        start: fitted.start,
        lines,
        top,
        limit,
        overflowed: fitted.overflowed,
        sign_off,
        sender,
    }
}

fn draw_body(p: &mut Painter<'_>, fonts: &mut FontBook, layout: &LetterLayout, body: &FittedBody) {
    let lh = body.line_height();
    let base = TextStyle::regular(body.size);
    for (i, line) in body.lines.iter().enumerate() {
        let baseline = baseline_in_box(body.top + i as f64 * lh, lh, body.size);
        fonts.draw_segments(
            p,
            line,
            base,
            Point::new(layout.margin, baseline),
            Align::Left,
            palette::INK,
        );
    }

    // Blank line, then the sign-off and the sender.
    let mut y = body.body_bottom() + lh;
    if let Some(sign_off) = &body.sign_off {
        fonts.draw_line(
            p,
            sign_off,
            TextStyle::bold(body.size),
            Point::new(layout.margin, baseline_in_box(y, lh, body.size)),
            Align::Left,
            palette::INK,
        );
        y += lh;
    }
    if let Some(sender) = &body.sender {
        let size = body.size * layout.sender_scale;
        let lh = f64::from(line_height(size));
        fonts.draw_line(
            p,
            sender,
            TextStyle::regular(size),
            Point::new(layout.margin, baseline_in_box(y, lh, size)),
            Align::Left,
            palette::INK_SOFT,
        );
    }
}

const SONG_SIZES: [f32; 3] = [22.0, 30.0, 24.0];
const SONG_OFFSETS: [f64; 3] = [54.0, 96.0, 132.0];

/// "Sent with", the track and "by {artist}", truncated to the space they get.
fn song_lines(
    fonts: &mut FontBook,
    request: &LetterRequest,
    layout: &LetterLayout,
    with_thumb: bool,
) -> Vec<String> {
    let budget = if with_thumb {
        layout.text_width() - layout.thumb - 24.0
    } else {
        layout.text_width()
    } as f32;
    vec![
        "Sent with".to_owned(),
        truncate(
            fonts,
            request.track_name.trim(),
            TextStyle::bold(SONG_SIZES[1]),
            budget,
        ),
        truncate(
            fonts,
            &format!("by {}", request.artist_name.trim()),
            TextStyle::regular(SONG_SIZES[2]),
            budget,
        ),
    ]
}

/// Dashed rule and song info. `thumb` is `Some` when an album-art URL was given; its inner
/// value is `None` when that art failed to load.
fn draw_footer(
    p: &mut Painter<'_>,
    fonts: &mut FontBook,
    layout: &LetterLayout,
    song: &[String],
    thumb: Option<Option<&ImagePaint>>,
) {
    let right = f64::from(layout.canvas.width) - layout.margin;
    p.dashed_line(
        layout.margin,
        right,
        layout.footer_top,
        14.0,
        10.0,
        2.0,
        palette::INK_SOFT.with_alpha(0.6),
    );

    let top = layout.footer_top + 24.0;
    let (x, align) = match thumb {
        Some(art) => {
            let rect = Rect::new(layout.margin, top, layout.margin + layout.thumb, top + layout.thumb);
            let shape = RoundedRect::from_rect(rect, layout.thumb_radius);
            match art {
                Some(art) => {
                    p.with_clip(&shape.to_path(0.1), |p| {
                        p.draw_image_cover(art, rect)
                    });
                }
                None => p.fill_shape(&shape, palette::PLACEHOLDER),
            }
            (layout.margin + layout.thumb + 24.0, Align::Left)
        }
        None => (f64::from(layout.canvas.width) / 2.0, Align::Center),
    };

    let styles = [
        TextStyle::regular(SONG_SIZES[0]),
        TextStyle::bold(SONG_SIZES[1]),
        TextStyle::regular(SONG_SIZES[2]),
    ];
    let colors = [palette::INK_SOFT, palette::INK, palette::INK_SOFT];
    for (i, text) in song.iter().enumerate().take(3) {
        fonts.draw_line(
            p,
            text,
            styles[i],
            Point::new(x, layout.footer_top + SONG_OFFSETS[i]),
            align,
            colors[i],
        );
    }
}

fn draw_watermark(p: &mut Painter<'_>, fonts: &mut FontBook, layout: &LetterLayout, branding: &Branding) {
    fonts.draw_line(
        p,
        &branding.watermark,
        TextStyle::regular(layout.watermark_size),
        Point::new(f64::from(layout.canvas.width) / 2.0, layout.watermark_baseline),
        Align::Center,
        palette::INK_SOFT.with_alpha(0.7),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/letter.rs"]
mod tests;
