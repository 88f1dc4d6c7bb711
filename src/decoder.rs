//! Payload decoding.
//!
//! This module reverses the encoder:
//! 1. Split the text into logical glyphs (base plus trailing modifiers)
//! 2. Resolve each glyph to its alphabet index
//! 3. Skip glyphs that do not resolve, recording one warning each
//! 4. Unpack the indices into whole bytes
//!
//! Unknown glyphs never abort a decode. Only a text in which nothing
//! resolves at all is an error.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::bits::unpack;
use crate::frame::{FrameMode, FrameRegistry};
use crate::registry::{GlyphRegistry, RegistryError};
use crate::text::tokenize::split_glyphs;

/// Errors that can occur during decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    #[error("No valid payload found ({skipped} unrecognized glyphs)")]
    NoValidGlyphs { skipped: usize },

    #[error("Registry error: {0}")]
    RegistryError(#[from] RegistryError),
}

/// A non-fatal problem met while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A glyph that is not in the alphabet was skipped.
    SkippedGlyph {
        /// Position of the glyph among the logical glyphs of the input.
        position: usize,
        /// The glyph text, modifiers included.
        glyph: String,
    },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::SkippedGlyph { position, glyph } => {
                write!(f, "skipped unrecognized glyph {glyph:?} at position {position}")
            }
        }
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    /// The recovered payload.
    pub bytes: Vec<u8>,
    /// Glyphs that were skipped along the way.
    pub warnings: Vec<DecodeWarning>,
}

impl DecodeResult {
    /// Number of glyphs skipped.
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, DecodeWarning::SkippedGlyph { .. }))
            .count()
    }

    /// Returns true if every glyph resolved.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A decode preceded by frame detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedDecode {
    /// The frame that was stripped (`none` if there was no frame).
    pub mode: FrameMode,
    /// The decoded payload.
    pub decoded: DecodeResult,
}

/// Configuration for the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Alphabet name or size; must match the one used to encode.
    pub alphabet: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            alphabet: crate::alphabet::builtin::EMOJI_64.to_string(),
        }
    }
}

/// Decodes an unframed glyph run.
pub fn decode(text: &str, alphabet: &Alphabet) -> Result<DecodeResult, DecoderError> {
    let glyphs = split_glyphs(text);
    let mut indices: Vec<u16> = Vec::with_capacity(glyphs.len());
    let mut warnings: Vec<DecodeWarning> = Vec::new();

    for (position, glyph) in glyphs.into_iter().enumerate() {
        match alphabet.index_of(glyph) {
            Some(index) => indices.push(index),
            None => {
                debug!(position, glyph, "skipping unrecognized glyph");
                warnings.push(DecodeWarning::SkippedGlyph {
                    position,
                    glyph: glyph.to_string(),
                });
            }
        }
    }

    if indices.is_empty() {
        return Err(DecoderError::NoValidGlyphs {
            skipped: warnings.len(),
        });
    }

    if !warnings.is_empty() {
        warn!(
            alphabet = alphabet.name(),
            skipped = warnings.len(),
            "decoded with unrecognized glyphs"
        );
    }

    let bytes = unpack(&indices, alphabet.bits_per_glyph());

    debug!(
        alphabet = alphabet.name(),
        glyphs = indices.len(),
        bytes = bytes.len(),
        "decoded payload"
    );

    Ok(DecodeResult { bytes, warnings })
}

/// Strips whatever frame surrounds `text`, then decodes the inside.
pub fn decode_framed(
    text: &str,
    alphabet: &Alphabet,
    frames: &FrameRegistry,
) -> Result<FramedDecode, DecoderError> {
    let stripped = frames.detect_and_strip(text.trim());
    let decoded = decode(stripped.inner, alphabet)?;
    Ok(FramedDecode {
        mode: stripped.mode,
        decoded,
    })
}

/// Decodes a framed glyph run with the alphabet resolved through the registry.
pub fn decode_with_config(
    text: &str,
    registry: &GlyphRegistry,
    config: &DecoderConfig,
) -> Result<FramedDecode, DecoderError> {
    let alphabet = registry.alphabet(&config.alphabet)?;
    decode_framed(text, alphabet, registry.frames())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, encode_framed};

    fn registry() -> GlyphRegistry {
        GlyphRegistry::builtin().unwrap()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let registry = registry();
        let data = b"\x00\x01\x02product-7731\xfe\xff";
        for alphabet in registry.alphabets() {
            let glyphs = encode(data, alphabet).unwrap();
            let decoded = decode(&glyphs, alphabet).unwrap();
            assert_eq!(&decoded.bytes[..data.len()], data, "{}", alphabet.name());
            assert!(decoded.is_clean());
        }
    }

    #[test]
    fn test_unknown_glyphs_are_skipped() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let data = b"key";
        let glyphs = encode(data, alphabet).unwrap();

        let noisy = format!("🦀{glyphs}x 🦀");
        let decoded = decode(&noisy, alphabet).unwrap();
        assert_eq!(decoded.bytes, data);
        assert_eq!(decoded.skipped(), 4);
        assert_eq!(
            decoded.warnings[0],
            DecodeWarning::SkippedGlyph {
                position: 0,
                glyph: "🦀".to_string()
            }
        );
    }

    #[test]
    fn test_no_valid_glyphs() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        assert_eq!(
            decode("hello", alphabet).unwrap_err(),
            DecoderError::NoValidGlyphs { skipped: 5 }
        );
        assert_eq!(
            decode("", alphabet).unwrap_err(),
            DecoderError::NoValidGlyphs { skipped: 0 }
        );
    }

    #[test]
    fn test_modifiers_do_not_change_result() {
        let registry = registry();
        let data = b"\xde\xad\xbe\xef";
        for alphabet in registry.alphabets() {
            let glyphs = encode(data, alphabet).unwrap();
            let with_modifiers: String = split_glyphs(&glyphs)
                .into_iter()
                .map(|g| format!("{g}\u{FE0F}"))
                .collect();
            let stripped: String = glyphs.chars().filter(|&c| c != '\u{FE0F}').collect();

            let expected = decode(&glyphs, alphabet).unwrap();
            assert_eq!(decode(&with_modifiers, alphabet).unwrap(), expected);
            assert_eq!(decode(&stripped, alphabet).unwrap(), expected);
        }
    }

    #[test]
    fn test_decode_framed_detects_mode() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-512").unwrap();
        for mode in FrameMode::ALL {
            let frame = registry.frame(mode).unwrap();
            let text = encode_framed(b"abcdefghi", alphabet, frame).unwrap();
            let framed = decode_framed(&text, alphabet, registry.frames()).unwrap();
            assert_eq!(framed.mode, mode);
            assert_eq!(framed.decoded.bytes, b"abcdefghi");
        }
    }

    #[test]
    fn test_decode_with_config() {
        let registry = registry();
        let alphabet = registry.alphabet("128").unwrap();
        let text = format!("✨{}✨", encode(b"id", alphabet).unwrap());
        let config = DecoderConfig {
            alphabet: "emoji-128".to_string(),
        };
        let framed = decode_with_config(&text, &registry, &config).unwrap();
        assert_eq!(framed.mode, FrameMode::SingleMarker);
        assert_eq!(framed.decoded.bytes, b"id");
    }
}
