//! Payload encoding.
//!
//! This module turns opaque bytes into a glyph run:
//! 1. Pack the bytes into `bits_per_glyph`-bit groups (zero padded)
//! 2. Map each group to the glyph at that index
//! 3. Optionally wrap the run in a frame so it can be found in free text

use thiserror::Error;
use tracing::debug;

use crate::alphabet::{Alphabet, AlphabetError};
use crate::bits::pack;
use crate::frame::{Frame, FrameMode};
use crate::registry::{GlyphRegistry, RegistryError};

/// Errors that can occur during encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncoderError {
    #[error("Empty payload: nothing to encode")]
    EmptyInput,

    #[error("Alphabet error: {0}")]
    AlphabetError(#[from] AlphabetError),

    #[error("Registry error: {0}")]
    RegistryError(#[from] RegistryError),
}

/// Result of encoding a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedGlyphs {
    /// The framed glyph text - this is what gets embedded.
    pub text: String,
    /// Number of payload glyphs, markers excluded.
    pub glyph_count: usize,
    /// Alphabet used.
    pub alphabet: String,
    /// Frame mode used.
    pub mode: FrameMode,
}

/// Configuration for the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Alphabet name or size.
    pub alphabet: String,
    /// Frame to wrap the glyph run in.
    pub mode: FrameMode,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            alphabet: crate::alphabet::builtin::EMOJI_64.to_string(),
            mode: FrameMode::default(),
        }
    }
}

/// Packs a payload into glyph indices.
///
/// The result has `ceil(8 * len / bits_per_glyph)` entries, each below the
/// alphabet size.
pub fn encode_indices(data: &[u8], alphabet: &Alphabet) -> Result<Vec<u16>, EncoderError> {
    if data.is_empty() {
        return Err(EncoderError::EmptyInput);
    }
    Ok(pack(data, alphabet.bits_per_glyph()))
}

/// Encodes a payload as an unframed glyph run.
///
/// An empty payload is rejected rather than encoded as an empty string.
pub fn encode(data: &[u8], alphabet: &Alphabet) -> Result<String, EncoderError> {
    let indices = encode_indices(data, alphabet)?;
    let glyph_count = indices.len();

    let mut out = String::with_capacity(indices.len() * 4);
    for index in indices {
        out.push_str(alphabet.glyph_at(index as usize)?);
    }

    debug!(
        alphabet = alphabet.name(),
        bytes = data.len(),
        glyphs = glyph_count,
        "encoded payload"
    );

    Ok(out)
}

/// Encodes a payload and wraps it in `frame`.
pub fn encode_framed(data: &[u8], alphabet: &Alphabet, frame: &Frame) -> Result<String, EncoderError> {
    Ok(frame.wrap(&encode(data, alphabet)?))
}

/// Encodes a payload with alphabet and frame resolved through the registry.
pub fn encode_with_config(
    data: &[u8],
    registry: &GlyphRegistry,
    config: &EncoderConfig,
) -> Result<EncodedGlyphs, EncoderError> {
    let alphabet = registry.alphabet(&config.alphabet)?;
    let frame = registry.frame(config.mode)?;

    let glyphs = encode(data, alphabet)?;
    let glyph_count = crate::bits::packed_len(data.len(), alphabet.bits_per_glyph());

    debug!(mode = %config.mode, glyph_count, "framing payload");

    Ok(EncodedGlyphs {
        text: frame.wrap(&glyphs),
        glyph_count,
        alphabet: alphabet.name().to_string(),
        mode: config.mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize::split_glyphs;

    fn registry() -> GlyphRegistry {
        GlyphRegistry::builtin().unwrap()
    }

    #[test]
    fn test_encode_empty_payload() {
        let registry = registry();
        for alphabet in registry.alphabets() {
            assert_eq!(encode(&[], alphabet).unwrap_err(), EncoderError::EmptyInput);
        }
    }

    #[test]
    fn test_encode_length_matches_bit_math() {
        let registry = registry();
        let data = b"lookup-key-0042";
        for alphabet in registry.alphabets() {
            let glyphs = encode(data, alphabet).unwrap();
            let expected = (data.len() * 8).div_ceil(alphabet.bits_per_glyph() as usize);
            assert_eq!(split_glyphs(&glyphs).len(), expected, "{}", alphabet.name());
        }
    }

    #[test]
    fn test_encode_known_glyphs() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        // 0x00 -> 0000000|0(000000) -> indices 0, 0
        assert_eq!(encode(&[0x00], alphabet).unwrap(), "🐀🐀");
        // 0xFE -> 1111111|0 -> 127, 0
        assert_eq!(encode(&[0xFE], alphabet).unwrap(), "👿🐀");
    }

    #[test]
    fn test_encode_uses_composite_glyphs() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        // 0x00 0x00 0x00 -> four zero groups -> four hearts
        assert_eq!(
            encode(&[0, 0, 0], alphabet).unwrap(),
            "❤\u{FE0F}".repeat(4)
        );
    }

    #[test]
    fn test_encode_framed() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let frame = registry.frame(FrameMode::SingleMarker).unwrap();
        assert_eq!(encode_framed(&[0x00], alphabet, frame).unwrap(), "✨🐀🐀✨");
    }

    #[test]
    fn test_encode_with_config() {
        let registry = registry();
        let config = EncoderConfig {
            alphabet: "512".to_string(),
            mode: FrameMode::LockMarker,
        };
        let encoded = encode_with_config(b"abc", &registry, &config).unwrap();
        assert_eq!(encoded.alphabet, "emoji-512");
        assert_eq!(encoded.glyph_count, 3);
        assert!(encoded.text.starts_with("🔑"));
        assert!(encoded.text.ends_with("🔒"));
    }

    #[test]
    fn test_encode_with_unknown_alphabet() {
        let config = EncoderConfig {
            alphabet: "emoji-1024".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            encode_with_config(b"abc", &registry(), &config).unwrap_err(),
            EncoderError::RegistryError(RegistryError::UnknownAlphabet(_))
        ));
    }
}
