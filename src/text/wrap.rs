//! Greedy word wrapping, mixed-weight wrapping and ellipsis truncation.

use crate::text::bold::{Segment, parse_bold, push_segment};
use crate::text::measure::{TextMeasure, TextStyle};

/// One wrapped line of mixed-weight text.
pub type StyledLine = Vec<Segment>;

/// Wrap `text` to `max_width`, keeping explicit line breaks.
///
/// Each `\n`-separated paragraph is packed greedily; empty paragraphs become empty lines. A word
/// wider than `max_width` is placed on a line of its own and never split.
pub fn wrap<M>(m: &mut M, text: &str, style: TextStyle, max_width: f32) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    for para in text.split('\n') {
        let mut words = para.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };
        let mut line = first.to_string();
        for word in words {
            let candidate = format!("{line} {word}");
            if m.measure(&candidate, style) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }
    lines
}

/// Replace every whitespace run (newlines included) with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Default)]
struct Word {
    pieces: Vec<Segment>,
    space_bold: bool,
}

fn split_words(segments: &[Segment]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Word::default();
    for seg in segments {
        let mut buf = String::new();
        for c in seg.text.chars() {
            if c == ' ' {
                push_segment(&mut current.pieces, &buf, seg.bold);
                buf.clear();
                if !current.pieces.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                current.space_bold = seg.bold;
            } else {
                buf.push(c);
            }
        }
        push_segment(&mut current.pieces, &buf, seg.bold);
    }
    if !current.pieces.is_empty() {
        words.push(current);
    }
    words
}

/// Total width of a mixed-weight run; bold pieces use the bold face.
pub fn styled_width<M>(m: &mut M, segments: &[Segment], base: TextStyle) -> f32
where
    M: TextMeasure + ?Sized,
{
    segments
        .iter()
        .map(|s| m.measure(&s.text, base.for_segment(s.bold)))
        .sum()
}

/// Wrap text containing `**bold**` spans.
///
/// Whitespace (including newlines) is collapsed first, so paragraph breaks are not preserved.
/// Each break decision measures the candidate line as its full sequence of normal and bold
/// runs.
pub fn wrap_bold<M>(m: &mut M, text: &str, max_width: f32, base: TextStyle) -> Vec<StyledLine>
where
    M: TextMeasure + ?Sized,
{
    let collapsed = collapse_whitespace(text);
    let words = split_words(&parse_bold(&collapsed));

    let mut lines = Vec::new();
    let mut line: StyledLine = Vec::new();
    for word in words {
        if line.is_empty() {
            line = word.pieces;
            continue;
        }
        let mut candidate = line.clone();
        push_segment(&mut candidate, " ", word.space_bold);
        for piece in &word.pieces {
            push_segment(&mut candidate, &piece.text, piece.bold);
        }
        if styled_width(m, &candidate, base) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.pieces));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
///
/// Text that already fits, or has two characters or fewer, is returned unchanged. Truncation
/// stops at two remaining characters even if the result is still too wide.
pub fn truncate<M>(m: &mut M, text: &str, style: TextStyle, max_width: f32) -> String
where
    M: TextMeasure + ?Sized,
{
    let mut chars: Vec<char> = text.chars().collect();
    if chars.len() <= 2 || m.measure(text, style) <= max_width {
        return text.to_string();
    }
    loop {
        chars.pop();
        let kept: String = chars.iter().collect();
        let candidate = format!("{}…", kept.trim_end());
        if chars.len() <= 2 || m.measure(&candidate, style) <= max_width {
            return candidate;
        }
    }
}

/// End a styled line with an ellipsis, dropping trailing characters until it fits.
///
/// Used for the last visible line when a block is cut short. Stops at two characters.
pub fn truncate_styled<M>(m: &mut M, line: &[Segment], base: TextStyle, max_width: f32) -> StyledLine
where
    M: TextMeasure + ?Sized,
{
    let mut chars: Vec<(char, bool)> = line
        .iter()
        .flat_map(|s| s.text.chars().map(move |c| (c, s.bold)))
        .collect();
    loop {
        while chars.last().is_some_and(|(c, _)| c.is_whitespace()) {
            chars.pop();
        }
        let mut out = Vec::new();
        for &(c, bold) in &chars {
            push_segment(&mut out, c.encode_utf8(&mut [0; 4]), bold);
        }
        push_segment(&mut out, "…", false);
        if chars.len() <= 2 || styled_width(m, &out, base) <= max_width {
            return out;
        }
        chars.pop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
