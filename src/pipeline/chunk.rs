//! Slide-sized text chunks.
//!
//! A page's text is cut into paragraph units at blank lines, then the units
//! are packed greedily into chunks whose joined length (units separated by
//! `"\n\n"`) stays within a character budget. Chunk boundaries only ever fall
//! between units: a unit longer than the budget gets a chunk of its own and
//! is never split. Lengths are counted in `char`s, not bytes, so non-Latin
//! text gets the same budget as ASCII.

use once_cell::sync::Lazy;
use regex::Regex;

/// One or more blank lines (whitespace-only lines count as blank).
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").unwrap());

/// Length of `"\n\n"` between units of a chunk.
const SEPARATOR_LEN: usize = 2;

/// Text destined for one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Trimmed, non-empty paragraph units in source order.
    pub paragraphs: Vec<String>,
}

impl TextChunk {
    /// Character count of the units joined by blank lines.
    pub fn char_len(&self) -> usize {
        let text: usize = self.paragraphs.iter().map(|p| p.chars().count()).sum();
        text + SEPARATOR_LEN * self.paragraphs.len().saturating_sub(1)
    }
}

/// Split `text` into trimmed, non-empty paragraph units at blank lines.
pub fn paragraph_units(text: &str) -> Vec<String> {
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pack the paragraph units of `text` into chunks of at most `budget` chars.
///
/// Returns an empty vector for empty or whitespace-only text.
pub fn split_text_chunks(text: &str, budget: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0usize;

    for unit in paragraph_units(text) {
        let unit_len = unit.chars().count();
        if !current.is_empty() && current_len + SEPARATOR_LEN + unit_len > budget {
            chunks.push(TextChunk {
                paragraphs: std::mem::take(&mut current),
            });
            current_len = 0;
        }

        if current.is_empty() {
            current_len = unit_len;
        } else {
            current_len += SEPARATOR_LEN + unit_len;
        }
        current.push(unit);
    }

    if !current.is_empty() {
        chunks.push(TextChunk {
            paragraphs: current,
        });
    }

    chunks
}

/// Cut `s` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
