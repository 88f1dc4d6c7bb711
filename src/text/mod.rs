//! Text handling for glyphkey.
//!
//! This module provides:
//! - Logical glyph segmentation (base codepoint plus presentation modifiers)
//! - Modifier normalization ahead of extraction
//! - Glyph-indexed scanning of arbitrary text

pub mod tokenize;

pub use tokenize::{
    glyph_spans, normalize_candidate, split_glyphs, strip_modifiers, GlyphScan, ModifierPolicy,
};
