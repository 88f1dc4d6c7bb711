//! # glyphkey - Bytes as emoji
//!
//! glyphkey turns short opaque payloads (lookup keys, ids, tokens) into runs of
//! Unicode glyphs that survive being pasted into ordinary text, and recovers
//! them again from whatever text surrounds them.
//!
//! ## Overview
//!
//! - Bytes are packed MSB-first into 6, 7 or 9 bit groups
//! - Each group selects one glyph of a 64, 128 or 512 glyph **alphabet**
//! - The run is optionally wrapped in a **frame** (`✨…✨`, `✨✨✨…✨✨✨`, `🔑…🔒`)
//! - Decoding skips glyphs it does not know and reports them as warnings
//! - Extraction finds a framed run inside noisy text, or falls back to
//!   collecting loose alphabet glyphs
//!
//! Presentation modifiers (U+FE0E, U+FE0F) that text fields add or remove do
//! not change what a glyph decodes to.
//!
//! ## Example Usage
//!
//! ```rust
//! use glyphkey::{decode_framed, encode_framed, ExtractOutcome, FrameMode, GlyphRegistry, TextExtractor};
//!
//! let registry = GlyphRegistry::builtin().unwrap();
//! let alphabet = registry.alphabet("emoji-128").unwrap();
//! let frame = registry.frame(FrameMode::SingleMarker).unwrap();
//!
//! let text = encode_framed(b"sku-42", alphabet, frame).unwrap();
//! let decoded = decode_framed(&text, alphabet, registry.frames()).unwrap();
//! assert_eq!(decoded.decoded.bytes, b"sku-42");
//!
//! // The same run pasted into a sentence
//! let message = format!("order {text} shipped");
//! let outcome = TextExtractor::new(&registry, alphabet).extract(&message).unwrap();
//! assert!(matches!(outcome, ExtractOutcome::FullMatch(_)));
//! assert_eq!(outcome.bytes(), Some(&b"sku-42"[..]));
//! ```
//!
//! ## Modules
//!
//! - [`alphabet`]: Alphabets and forgiving glyph lookup
//! - [`bits`]: Fixed-width bit packing
//! - [`frame`]: Delimiter frames and frame detection
//! - [`registry`]: The shared registry of alphabets and frames
//! - [`encoder`]: Bytes to glyphs
//! - [`decoder`]: Glyphs to bytes, tolerant of unknown glyphs
//! - [`extractor`]: Payload recovery from noisy text
//! - [`capacity`]: Glyph budget calculations
//! - [`config`]: `~/.glyphkey/config.toml`
//! - [`text`]: Glyph segmentation and modifier normalization

pub mod alphabet;
pub mod bits;
pub mod capacity;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod extractor;
pub mod frame;
pub mod registry;
pub mod text;

// Re-export commonly used types at the crate root
pub use alphabet::{Alphabet, AlphabetError, AlphabetSize};
pub use capacity::{capacity_info, max_payload_bytes, CapacityInfo};
pub use config::{ConfigError, CustomAlphabet, GlyphConfig};
pub use decoder::{
    decode, decode_framed, decode_with_config, DecodeResult, DecodeWarning, DecoderConfig,
    DecoderError, FramedDecode,
};
pub use encoder::{
    encode, encode_framed, encode_indices, encode_with_config, EncodedGlyphs, EncoderConfig,
    EncoderError,
};
pub use extractor::{
    extract, ExtractError, ExtractOutcome, Extraction, ExtractionResult, MatchKind, TextExtractor,
};
pub use frame::{Frame, FrameError, FrameMode, FrameRegistry};
pub use registry::{GlyphRegistry, RegistryError};
