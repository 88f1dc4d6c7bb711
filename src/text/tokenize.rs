//! Glyph segmentation for glyphkey.
//!
//! Text is split into logical glyphs: one base codepoint followed by any
//! number of invisible presentation modifiers (U+FE0E, U+FE0F). Modifiers
//! that appear before any base codepoint belong to no glyph and are dropped.
//!
//! Modifier cleanup for extraction happens in exactly one place,
//! [`normalize_candidate`]. Call sites must not strip modifiers themselves.

use std::ops::Range;

/// Text presentation selector (VS15).
pub const TEXT_PRESENTATION: char = '\u{FE0E}';

/// Emoji presentation selector (VS16).
pub const EMOJI_PRESENTATION: char = '\u{FE0F}';

/// Returns true for the invisible codepoints that only select a rendering variant.
pub fn is_presentation_modifier(c: char) -> bool {
    matches!(c, TEXT_PRESENTATION | EMOJI_PRESENTATION)
}

/// Returns true if the glyph carries at least one presentation modifier.
pub fn has_modifier(glyph: &str) -> bool {
    glyph.chars().any(is_presentation_modifier)
}

/// Removes every presentation modifier from the text.
pub fn strip_modifiers(text: &str) -> String {
    text.chars().filter(|&c| !is_presentation_modifier(c)).collect()
}

/// How [`normalize_candidate`] treats presentation modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierPolicy {
    /// Drop all modifiers. Used when no alphabet tells bare and composite glyphs apart.
    Strip,
    /// Keep the first modifier of each glyph and drop repeats and orphans.
    Collapse,
}

/// Normalizes a candidate text before marker search and decoding.
pub fn normalize_candidate(text: &str, policy: ModifierPolicy) -> String {
    match policy {
        ModifierPolicy::Strip => strip_modifiers(text),
        ModifierPolicy::Collapse => {
            let mut out = String::with_capacity(text.len());
            let mut last_was_base = false;
            for c in text.chars() {
                if is_presentation_modifier(c) {
                    if last_was_base {
                        out.push(c);
                    }
                    last_was_base = false;
                } else {
                    out.push(c);
                    last_was_base = true;
                }
            }
            out
        }
    }
}

/// Splits text into logical glyphs.
pub fn split_glyphs(text: &str) -> Vec<&str> {
    glyph_spans(text).into_iter().map(|span| &text[span]).collect()
}

/// Byte ranges of the logical glyphs in `text`.
pub fn glyph_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();

    for (pos, c) in text.char_indices() {
        let end = pos + c.len_utf8();
        if is_presentation_modifier(c) {
            // Attach to the glyph that ends right here, otherwise it is an orphan.
            if let Some(last) = spans.last_mut() {
                if last.end == pos {
                    last.end = end;
                }
            }
        } else {
            spans.push(pos..end);
        }
    }

    spans
}

/// A text prepared for glyph-level scanning.
#[derive(Debug, Clone)]
pub struct GlyphScan {
    /// The scanned text.
    pub text: String,
    spans: Vec<Range<usize>>,
}

impl GlyphScan {
    /// Segments `text` into logical glyphs.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let spans = glyph_spans(&text);
        Self { text, spans }
    }

    /// Number of logical glyphs.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if the text holds no glyph.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The glyph at `index`.
    pub fn glyph(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|span| &self.text[span.clone()])
    }

    /// Iterates over all glyphs in order.
    pub fn glyphs(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(move |span| &self.text[span.clone()])
    }

    /// The text covering glyphs `range.start..range.end`.
    pub fn slice(&self, range: Range<usize>) -> &str {
        if range.start >= range.end || range.start >= self.spans.len() {
            return "";
        }
        let end = range.end.min(self.spans.len());
        &self.text[self.spans[range.start].start..self.spans[end - 1].end]
    }

    /// Returns true if the glyphs starting at `index` equal `pattern`'s glyphs.
    pub fn starts_with_at(&self, index: usize, pattern: &[&str]) -> bool {
        if pattern.is_empty() || index + pattern.len() > self.spans.len() {
            return false;
        }
        pattern
            .iter()
            .enumerate()
            .all(|(offset, expected)| self.glyph(index + offset) == Some(*expected))
    }
}
