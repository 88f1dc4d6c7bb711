//! Glyph budget calculations.
//!
//! Answers "how many glyphs will this payload take" and the reverse, for
//! callers that embed payloads in length-limited fields.

use crate::alphabet::Alphabet;
use crate::bits::{packed_len, unpacked_len};
use crate::frame::Frame;

/// Glyph cost of a payload in a given alphabet and frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityInfo {
    /// Payload size in bytes
    pub data_bytes: usize,
    /// Payload glyphs, markers excluded
    pub glyphs: usize,
    /// Zero bits appended to fill the last glyph
    pub padding_bits: usize,
    /// Total glyphs including the frame markers
    pub framed_glyphs: usize,
}

/// Returns the glyph cost of a `byte_len`-byte payload.
///
/// Glyph counts saturate at `usize::MAX` for sizes no text could hold.
pub fn capacity_info(byte_len: usize, alphabet: &Alphabet, frame: &Frame) -> CapacityInfo {
    let bits = alphabet.bits_per_glyph();
    let glyphs = packed_len(byte_len, bits);
    let width = u128::from(bits);
    let padding_bits = ((width - (byte_len as u128 * 8) % width) % width) as usize;
    let markers = frame.prefix_glyphs().len() + frame.suffix_glyphs().len();

    CapacityInfo {
        data_bytes: byte_len,
        glyphs,
        padding_bits,
        framed_glyphs: glyphs.saturating_add(markers),
    }
}

/// Largest payload that fits in `glyph_count` payload glyphs.
pub fn max_payload_bytes(glyph_count: usize, alphabet: &Alphabet) -> usize {
    unpacked_len(glyph_count, alphabet.bits_per_glyph())
}
