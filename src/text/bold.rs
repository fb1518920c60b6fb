//! `**bold**` span parsing.

/// A run of text in one weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// The characters, with delimiters removed.
    pub text: String,
    /// Whether the run is bold.
    pub bold: bool,
}

impl Segment {
    /// Normal-weight segment.
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Bold segment.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Split `text` into normal and bold segments.
///
/// Matched `**…**` pairs become bold runs without their delimiters. An opening `**` with no
/// closing partner stays in the output as literal text. Empty runs are dropped and adjacent
/// runs of the same weight are merged.
pub fn parse_bold(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut rest = text;
    loop {
        let Some(open) = rest.find("**") else {
            push_segment(&mut out, rest, false);
            break;
        };
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            push_segment(&mut out, rest, false);
            break;
        };
        push_segment(&mut out, &rest[..open], false);
        push_segment(&mut out, &after[..close], true);
        rest = &after[close + 2..];
    }
    out
}

/// Append `text`, merging into the previous segment when the weight matches.
pub(crate) fn push_segment(out: &mut Vec<Segment>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => out.push(Segment {
            text: text.to_string(),
            bold,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/bold.rs"]
mod tests;
