//! Text layout heuristics: wrapping by character density and font sizing.

use std::collections::VecDeque;

use crate::config::Heuristics;

/// Wrap `text` so no line holds more than `floor(box_width * chars_per_unit)`
/// characters (at least one). Lines are joined with `\n`.
///
/// Words are split on whitespace and after hyphens between letters, then
/// packed greedily. A piece longer than a line first fills what is left of
/// the current line and continues on the next.
pub fn wrap_to_width(text: &str, box_width: f64, chars_per_unit: f64) -> String {
    if text.is_empty() {
        return String::new();
    }
    let max_chars = max_line_chars(box_width, chars_per_unit);
    wrap_text(text, max_chars).join("\n")
}

/// Maximum characters per wrapped line for a box width.
pub fn max_line_chars(box_width: f64, chars_per_unit: f64) -> usize {
    let raw = (box_width * chars_per_unit).floor();
    if raw.is_finite() && raw >= 1.0 {
        floor_to_usize(raw)
    } else {
        1
    }
}

/// A piece of a word, and whether a space precedes it.
struct Chunk {
    text: String,
    starts_word: bool,
}

/// Wrap text into lines of at most `max_chars` characters
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks: VecDeque<Chunk> = text
        .split_whitespace()
        .flat_map(|word| {
            split_hyphens(word)
                .into_iter()
                .enumerate()
                .map(|(i, piece)| Chunk {
                    text: piece.to_string(),
                    starts_word: i == 0,
                })
        })
        .collect();

    let mut lines = Vec::new();
    while !chunks.is_empty() {
        let mut line = String::new();
        let mut len = 0;

        while let Some(chunk) = chunks.front() {
            let sep = usize::from(chunk.starts_word && len > 0);
            let chunk_len = chunk.text.chars().count();
            if len + sep + chunk_len > max_chars {
                break;
            }
            if sep > 0 {
                line.push(' ');
            }
            line.push_str(&chunk.text);
            len += sep + chunk_len;
            chunks.pop_front();
        }

        // Long pieces fill the rest of the line before moving on
        if let Some(chunk) = chunks.front_mut() {
            if chunk.text.chars().count() > max_chars {
                let sep = usize::from(chunk.starts_word && len > 0);
                let space_left = max_chars.saturating_sub(len + sep);
                if space_left > 0 {
                    let split = chunk
                        .text
                        .char_indices()
                        .nth(space_left)
                        .map_or(chunk.text.len(), |(i, _)| i);
                    let rest = chunk.text.split_off(split);
                    if sep > 0 {
                        line.push(' ');
                    }
                    line.push_str(&chunk.text);
                    chunk.text = rest;
                    chunk.starts_word = false;
                }
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Split a word after each hyphen that joins two letters on either side,
/// e.g. `well-known` but not `-5` or `a-b`.
fn split_hyphens(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let letter = |i: usize| chars.get(i).is_some_and(|&(_, c)| c.is_alphabetic() || c == '_');
    let hyphen = |i: usize| chars.get(i).is_some_and(|&(_, c)| c == '-');

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, &(offset, c)) in chars.iter().enumerate() {
        if c != '-' || i < 2 {
            continue;
        }
        let before = letter(i - 1) && (letter(i - 2) || (i >= 3 && hyphen(i - 2) && letter(i - 3)));
        let after = letter(i + 1) && (letter(i + 2) || (hyphen(i + 2) && letter(i + 3)));
        if before && after {
            let end = offset + c.len_utf8();
            if let Some(piece) = word.get(start..end) {
                pieces.push(piece);
            }
            start = end;
        }
    }
    if let Some(rest) = word.get(start..) {
        if !rest.is_empty() {
            pieces.push(rest);
        }
    }
    pieces
}

/// Font size in points for a cell's text.
///
/// An explicit source size is scaled by `explicit_size_scale` and used as is.
/// Otherwise the size is derived from the box width and text length and
/// clamped to `[min_font_size, max_font_size]`; merged cells get the larger
/// base.
pub fn resolve_font_size(
    explicit: Option<f64>,
    text: &str,
    box_width: f64,
    merged: bool,
    heuristics: &Heuristics,
) -> f64 {
    if let Some(size) = explicit {
        return size * heuristics.explicit_size_scale;
    }
    let base = if merged {
        heuristics.merged_size_base
    } else {
        heuristics.plain_size_base
    };
    let len = text.chars().count().max(1);
    let size = box_width * base / len_as_f64(len);
    if size.is_nan() {
        return heuristics.min_font_size;
    }
    size.clamp(heuristics.min_font_size, heuristics.max_font_size)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_usize(v: f64) -> usize {
    // callers pass a finite value >= 1
    v.min(f64::from(u32::MAX)) as usize
}

#[allow(clippy::cast_precision_loss)]
fn len_as_f64(n: usize) -> f64 {
    n as f64
}
