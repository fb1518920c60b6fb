/// Which face a run of text is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    /// Body text.
    Regular,
    /// Bold body text (`**spans**`, sign-offs, names).
    Bold,
    /// Handwritten/display face for greetings, headers and the wordmark.
    Display,
}

/// Face and pixel size of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Face.
    pub role: FontRole,
    /// Font size in pixels.
    pub size: f32,
}

impl TextStyle {
    /// Regular face at `size`.
    pub fn regular(size: f32) -> Self {
        Self {
            role: FontRole::Regular,
            size,
        }
    }

    /// Bold face at `size`.
    pub fn bold(size: f32) -> Self {
        Self {
            role: FontRole::Bold,
            size,
        }
    }

    /// Display face at `size`.
    pub fn display(size: f32) -> Self {
        Self {
            role: FontRole::Display,
            size,
        }
    }

    /// Same face, different size.
    pub fn with_size(self, size: f32) -> Self {
        Self { size, ..self }
    }

    /// Style for a segment that is (or is not) marked bold.
    pub fn for_segment(self, bold: bool) -> Self {
        if bold {
            Self::bold(self.size)
        } else {
            self
        }
    }
}

/// Width measurement for a single-line run of text.
pub trait TextMeasure {
    /// Advance width of `text` in pixels when set in `style`.
    fn measure(&mut self, text: &str, style: TextStyle) -> f32;
}

/// Deterministic advance estimates used when no font face is available.
///
/// Widths are per-character fractions of the font size, so layout decisions stay stable even
/// before (or without) real fonts.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMetrics;

impl ApproxMetrics {
    /// Advance of one character as a fraction of the font size.
    pub fn advance_em(c: char, role: FontRole) -> f32 {
        let base = match c {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | '\'' | '!' | '|' | ':' | ';' => 0.28,
            'm' | 'w' | 'M' | 'W' => 0.82,
            c if c.is_ascii_uppercase() => 0.66,
            c if c.is_ascii_digit() => 0.55,
            _ => 0.52,
        };
        match role {
            FontRole::Bold => base * 1.08,
            FontRole::Regular | FontRole::Display => base,
        }
    }
}

impl TextMeasure for ApproxMetrics {
    fn measure(&mut self, text: &str, style: TextStyle) -> f32 {
        text.chars()
            .map(|c| Self::advance_em(c, style.role))
            .sum::<f32>()
            * style.size
    }
}
