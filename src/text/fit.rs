//! Shrink-to-fit font sizing shared by both renderers.

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.65;

/// Line box height for `size`.
pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// Whole lines of `size` that fit in `available` (at least one).
pub fn max_lines(available: f32, size: f32) -> usize {
    let lh = line_height(size);
    if lh <= 0.0 || !available.is_finite() {
        return 1;
    }
    ((available / lh).floor() as usize).max(1)
}

/// Starting font sizes keyed by message length: the first tier whose `max_chars` is at least
/// the message length wins; longer messages fall through to `fallback`.
#[derive(Clone, Debug, PartialEq)]
pub struct FontTiers {
    tiers: Vec<(usize, f32)>,
    fallback: f32,
}

impl FontTiers {
    /// Build from `(max_chars, size)` pairs in ascending `max_chars` order.
    pub fn new(tiers: impl Into<Vec<(usize, f32)>>, fallback: f32) -> Self {
        let mut tiers = tiers.into();
        tiers.sort_by_key(|(n, _)| *n);
        Self { tiers, fallback }
    }

    /// Starting size for a message of `len` characters.
    pub fn start_size(&self, len: usize) -> f32 {
        self.tiers
            .iter()
            .find(|(max, _)| len <= *max)
            .map(|(_, size)| *size)
            .unwrap_or(self.fallback)
    }

    /// The largest (first) tier size.
    pub fn largest(&self) -> f32 {
        self.tiers
            .first()
            .map(|(_, s)| *s)
            .unwrap_or(self.fallback)
    }
}

/// Inputs to [`fit_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitParams {
    /// First size tried.
    pub start: f32,
    /// Smallest size allowed.
    pub floor: f32,
    /// Decrement per attempt.
    pub step: f32,
    /// Vertical budget in pixels.
    pub available: f32,
}

/// Outcome of [`fit_text`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fitted<L> {
    /// Final font size.
    pub size: f32,
    /// Size the search started at.
    pub start: f32,
    /// Layout produced at `size`.
    pub layout: L,
    /// Block height at `size`.
    pub height: f32,
    /// `true` when the floor was reached and the block still exceeds the budget.
    pub overflowed: bool,
}

/// Find the largest size, stepping down from `params.start`, whose layout fits.
///
/// `layout` returns the layout at a given size plus the total block height it needs (including
/// any fixed blocks the caller reserves). The loop always terminates: sizes strictly decrease
/// until `params.floor`.
pub fn fit_text<L>(params: FitParams, mut layout: impl FnMut(f32) -> (L, f32)) -> Fitted<L> {
    let floor = params.floor.max(1.0);
    let step = params.step.max(0.5);
    let start = params.start.max(floor);
    let mut size = start;
    loop {
        let (lines, height) = layout(size);
        if height <= params.available || size <= floor {
            let overflowed = height > params.available;
            if overflowed {
                tracing::debug!(size, height, available = params.available, "text overflows at floor size");
            }
            return Fitted {
                size,
                start,
                layout: lines,
                height,
                overflowed,
            };
        }
        size = (size - step).max(floor);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
