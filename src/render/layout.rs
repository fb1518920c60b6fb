//! Per-format template geometry.
//!
//! Both polaroid formats share one drawing routine; everything that differs between them lives
//! in these tables.

use crate::foundation::core::{Canvas, Format, Rect, Rgba8};
use crate::text::fit::FontTiers;

/// Card geometry in canvas pixels, before rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardMetrics {
    pub x: f64,
    pub top: f64,
    pub width: f64,
    pub padding: f64,
    pub photo: f64,
    pub height: f64,
    pub radius: f64,
    /// Card tilt in degrees, clockwise positive.
    pub tilt_deg: f64,
}

impl CardMetrics {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.top, self.x + self.width, self.top + self.height)
    }

    /// Photo square, card-local.
    pub fn photo_rect(&self) -> Rect {
        Rect::new(
            self.padding,
            self.padding,
            self.padding + self.photo,
            self.padding + self.photo,
        )
    }

    /// Strip under the photo, card-local.
    pub fn strip_rect(&self) -> Rect {
        Rect::new(
            self.padding,
            self.padding * 1.5 + self.photo,
            self.width - self.padding,
            self.height - self.padding * 0.5,
        )
    }
}

/// Caption above the card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeaderStyle {
    /// Two small centered lines.
    Compact {
        first_baseline: f64,
        second_baseline: f64,
        first_size: f32,
        second_size: f32,
    },
    /// Large caption with floating notes and a dashed underline.
    Decorated {
        first_baseline: f64,
        second_baseline: f64,
        first_size: f32,
        second_size: f32,
        underline_y: f64,
    },
}

/// Branding block under the card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FooterMetrics {
    pub wordmark_baseline: f64,
    pub wordmark_size: f32,
    pub tagline_baseline: f64,
    pub tagline_size: f32,
    pub rule_y: f64,
    pub rule_gap: f64,
    pub rule_width: f64,
}

/// Song row at the bottom of the card strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SongRowMetrics {
    pub art_diameter: f64,
    pub gap: f64,
    pub track_size: f32,
    pub artist_size: f32,
}

/// Complete polaroid template for one format.
#[derive(Clone, Debug, PartialEq)]
pub struct PolaroidLayout {
    pub canvas: Canvas,
    pub card: CardMetrics,
    pub header: HeaderStyle,
    pub footer: Option<FooterMetrics>,
    pub greeting_size: f32,
    pub song: SongRowMetrics,
    pub tiers: FontTiers,
    pub floor: f32,
    pub step: f32,
    pub watermark_size: f32,
}

impl PolaroidLayout {
    pub fn for_format(format: Format) -> Self {
        let card = |top: f64| CardMetrics {
            x: 140.0,
            top,
            width: 800.0,
            padding: 36.0,
            photo: 728.0,
            height: 1100.0,
            radius: 18.0,
            tilt_deg: -1.5,
        };
        let song = SongRowMetrics {
            art_diameter: 72.0,
            gap: 20.0,
            track_size: 26.0,
            artist_size: 22.0,
        };
        let tiers = FontTiers::new(
            vec![(40, 40.0), (100, 32.0), (200, 26.0), (350, 22.0)],
            18.0,
        );
        match format {
            Format::Ig => Self {
                canvas: format.canvas(),
                card: card(170.0),
                header: HeaderStyle::Compact {
                    first_baseline: 78.0,
                    second_baseline: 130.0,
                    first_size: 44.0,
                    second_size: 34.0,
                },
                footer: None,
                greeting_size: 34.0,
                song,
                tiers,
                floor: 14.0,
                step: 1.0,
                watermark_size: 20.0,
            },
            Format::Tiktok => Self {
                canvas: format.canvas(),
                card: card(390.0),
                header: HeaderStyle::Decorated {
                    first_baseline: 200.0,
                    second_baseline: 282.0,
                    first_size: 72.0,
                    second_size: 56.0,
                    underline_y: 318.0,
                },
                footer: Some(FooterMetrics {
                    wordmark_baseline: 1640.0,
                    wordmark_size: 96.0,
                    tagline_baseline: 1704.0,
                    tagline_size: 30.0,
                    rule_y: 1748.0,
                    rule_gap: 10.0,
                    rule_width: 3.0,
                }),
                greeting_size: 34.0,
                song,
                tiers,
                floor: 14.0,
                step: 1.0,
                watermark_size: 22.0,
            },
        }
    }
}

/// Letter template; letters always use the portrait canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct LetterLayout {
    pub canvas: Canvas,
    pub margin: f64,
    pub greeting_baseline: f64,
    pub greeting_size: f32,
    /// Body top when a greeting is drawn.
    pub body_top: f64,
    /// Body top without a greeting.
    pub body_top_bare: f64,
    /// Dashed separator; text must end above `footer_top - footer_gap`.
    pub footer_top: f64,
    pub footer_gap: f64,
    pub thumb: f64,
    pub thumb_radius: f64,
    pub sender_scale: f32,
    pub tiers: FontTiers,
    pub floor: f32,
    pub step: f32,
    pub watermark_baseline: f64,
    pub watermark_size: f32,
}

impl Default for LetterLayout {
    fn default() -> Self {
        Self {
            canvas: Format::Ig.canvas(),
            margin: 100.0,
            greeting_baseline: 170.0,
            greeting_size: 52.0,
            body_top: 220.0,
            body_top_bare: 130.0,
            footer_top: 1090.0,
            footer_gap: 30.0,
            thumb: 120.0,
            thumb_radius: 16.0,
            sender_scale: 0.85,
            tiers: FontTiers::new(
                vec![(100, 44.0), (300, 36.0), (600, 30.0), (1000, 26.0)],
                26.0,
            ),
            floor: 14.0,
            step: 1.0,
            watermark_baseline: 1310.0,
            watermark_size: 22.0,
        }
    }
}

impl LetterLayout {
    /// Lowest y the greeting/body/sign-off block may reach.
    pub fn text_limit(&self) -> f64 {
        self.footer_top - self.footer_gap
    }

    pub fn text_width(&self) -> f64 {
        f64::from(self.canvas.width) - 2.0 * self.margin
    }
}

/// Shared palette.
pub mod palette {
    use super::Rgba8;

    pub const INK: Rgba8 = Rgba8::rgb(0x3b, 0x2f, 0x2a);
    pub const INK_SOFT: Rgba8 = Rgba8::rgb(0x6e, 0x5f, 0x55);
    pub const CARD: Rgba8 = Rgba8::rgb(0xfd, 0xfb, 0xf6);
    pub const BG_INNER: Rgba8 = Rgba8::rgb(0xfb, 0xf1, 0xe1);
    pub const BG_OUTER: Rgba8 = Rgba8::rgb(0xe8, 0xd2, 0xb4);
    pub const CREAM: Rgba8 = Rgba8::rgb(0xf6, 0xef, 0xe2);
    pub const PLACEHOLDER: Rgba8 = Rgba8::rgb(0xd8, 0xc6, 0xa8);
    pub const ACCENT: Rgba8 = Rgba8::rgb(0xb5, 0x6a, 0x4c);
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
