use crate::font::{FontFace, Glyph};
use crate::layout::options::TextOptions;

/// One laid-out line: measured width plus the index of its first
/// character in the input slice. A line owns the characters from its
/// `start` up to the next line's `start` (or end of input).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInfo {
    pub width: f32,
    pub start: usize,
}

/// Pen advance contributed by one glyph, at the requested text size.
///
/// The per-style spacing percentage stretches every advance uniformly,
/// so the breaker and the typesetter must both measure with it.
pub(crate) fn advance_step(face: &FontFace, glyph: &Glyph, options: &TextOptions) -> f32 {
    let spacing = 1.0 + face.style(options.style).spacing * 0.01;
    glyph.advance * glyph.scale * face.scale_for(options.size) * spacing
}

/// Greedy word-wrapping line breaker.
///
/// Scans left to right accumulating the current line width and the
/// width of the in-progress word (a word ends at a space). When the
/// line overflows `box_width`:
///
/// - if the line already contains a completed word, the line breaks
///   before the word being scanned, which restarts on the next line;
/// - otherwise the single token is wider than the box and is
///   hard-broken right before the character that overflowed.
///
/// A character that overflows the box on its own at the start of a line
/// stays there, so every character lands in exactly one line and the
/// breaker always makes progress. Characters without a glyph entry
/// contribute zero width but still count for line membership.
pub fn break_lines(
    chars: &[char],
    face: &FontFace,
    options: &TextOptions,
    box_width: f32,
) -> Vec<LineInfo> {
    let mut lines = Vec::new();
    if chars.is_empty() {
        return lines;
    }

    let mut line_start = 0usize;
    let mut line_width = 0.0f32;
    // Width, character count and completed-word count for the line so far.
    let mut word_width = 0.0f32;
    let mut word_chars = 0usize;
    let mut words_done = 0usize;

    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        if c == ' ' {
            words_done += 1;
            word_width = 0.0;
            word_chars = 0;
        }

        let advance = face
            .glyph(c)
            .map(|g| advance_step(face, g, options))
            .unwrap_or(0.0);
        line_width += advance;
        if c != ' ' {
            word_chars += 1;
            word_width += advance;
        }

        if line_width > box_width {
            if words_done > 0 {
                // Break before the overflowing word and rescan it as the
                // start of the next line.
                let word_start = i + 1 - word_chars;
                lines.push(LineInfo {
                    width: line_width - word_width,
                    start: line_start,
                });
                line_start = word_start;
                i = word_start;
            } else if i > line_start {
                // Single token wider than the box: hard break before the
                // character that overflowed.
                lines.push(LineInfo {
                    width: line_width - advance,
                    start: line_start,
                });
                line_start = i;
            } else {
                // Lone first character wider than the box keeps its line.
                i += 1;
                continue;
            }
            line_width = 0.0;
            word_width = 0.0;
            word_chars = 0;
            words_done = 0;
            continue;
        }

        i += 1;
    }

    lines.push(LineInfo {
        width: line_width,
        start: line_start,
    });
    lines
}
