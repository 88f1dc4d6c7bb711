//! Payload recovery from noisy text.
//!
//! Given any text window (for example everything around a cursor in a
//! third-party text field), [`TextExtractor::extract`] finds an embedded glyph
//! run and decodes it. There are three outcomes:
//!
//! - **Full match**: a complete frame was found. The first frame wins, and
//!   it closes at the next occurrence of its own suffix after a non-empty
//!   inner run.
//! - **Partial match**: no complete frame, but a marker or at least one
//!   alphabet glyph is present. Every alphabet glyph in the text is
//!   collected, wrapped in a single-marker frame and decoded. Best effort.
//! - **No match**: neither markers nor alphabet glyphs.
//!
//! A full match always takes precedence. If the full match fails to decode
//! there is no fallback to the partial path.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use thiserror::Error;
use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::decoder::{decode, DecodeResult, DecoderError};
use crate::frame::{Frame, FrameMode};
use crate::registry::{GlyphRegistry, RegistryError};
use crate::text::tokenize::{normalize_candidate, strip_modifiers, GlyphScan, ModifierPolicy};

/// Which extraction path produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Full,
    Partial,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Full => f.write_str("full"),
            MatchKind::Partial => f.write_str("partial"),
        }
    }
}

/// A match was found but nothing in it decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Found a {kind} match but could not decode it: {source}")]
    Undecodable {
        kind: MatchKind,
        #[source]
        source: DecoderError,
    },
}

impl ExtractError {
    /// The path that produced the undecodable candidate.
    pub fn kind(&self) -> MatchKind {
        match self {
            ExtractError::Undecodable { kind, .. } => *kind,
        }
    }
}

/// The substring located in the text, with its framing identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// The framed candidate, markers included.
    ///
    /// For a full match this is the substring of the input exactly as found,
    /// modifiers included. For a partial match it is the synthesized frame
    /// around the collected glyphs.
    pub matched_text: String,
    /// The candidate with its frame stripped, after modifier normalization.
    pub inner_payload: String,
    /// The frame that was stripped, if any.
    pub detected_mode: Option<FrameMode>,
}

/// A located and decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub decoded: DecodeResult,
}

/// Outcome of searching a text for a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    FullMatch(Extraction),
    PartialMatch(Extraction),
    NoMatch,
}

impl ExtractOutcome {
    /// The extraction, for either match kind.
    pub fn extraction(&self) -> Option<&Extraction> {
        match self {
            ExtractOutcome::FullMatch(e) | ExtractOutcome::PartialMatch(e) => Some(e),
            ExtractOutcome::NoMatch => None,
        }
    }

    /// The match kind, `None` for no match.
    pub fn kind(&self) -> Option<MatchKind> {
        match self {
            ExtractOutcome::FullMatch(_) => Some(MatchKind::Full),
            ExtractOutcome::PartialMatch(_) => Some(MatchKind::Partial),
            ExtractOutcome::NoMatch => None,
        }
    }

    /// The decoded bytes, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.extraction().map(|e| e.decoded.bytes.as_slice())
    }
}

/// A frame located in a [`GlyphScan`], in glyph positions.
#[derive(Debug, Clone)]
struct FrameMatch {
    span: Range<usize>,
    mode: FrameMode,
}

/// Finds and decodes payloads inside arbitrary text.
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor<'r> {
    registry: &'r GlyphRegistry,
    alphabet: &'r Alphabet,
}

impl<'r> TextExtractor<'r> {
    /// Creates an extractor decoding with `alphabet`.
    pub fn new(registry: &'r GlyphRegistry, alphabet: &'r Alphabet) -> Self {
        Self { registry, alphabet }
    }

    /// Creates an extractor for the alphabet named (or sized) `selector`.
    pub fn for_alphabet(registry: &'r GlyphRegistry, selector: &str) -> Result<Self, RegistryError> {
        Ok(Self::new(registry, registry.alphabet(selector)?))
    }

    /// Searches `text` for an embedded payload and decodes it.
    pub fn extract(&self, text: &str) -> Result<ExtractOutcome, ExtractError> {
        let scan = GlyphScan::new(self.normalize(text));

        if let Some(found) = self.find_full_match(&scan) {
            let matched = scan.slice(found.span.clone());
            // Normalization keeps one glyph per input glyph, so spans line up
            let original = GlyphScan::new(text).slice(found.span.clone()).to_string();
            debug!(mode = %found.mode, glyphs = found.span.len(), "full match");
            return self
                .decode_candidate(matched, original)
                .map(ExtractOutcome::FullMatch)
                .map_err(|source| ExtractError::Undecodable {
                    kind: MatchKind::Full,
                    source,
                });
        }

        let has_marker = scan.glyphs().any(|g| self.registry.frames().is_marker(g));
        let collected: String = scan
            .glyphs()
            .filter(|g| self.registry.is_alphabet_glyph(g))
            .collect();

        if !has_marker && collected.is_empty() {
            debug!("no markers and no alphabet glyphs");
            return Ok(ExtractOutcome::NoMatch);
        }

        warn!(
            has_marker,
            collected = collected.len(),
            "no complete frame, falling back to collected glyphs"
        );

        let synthesized = self.partial_frame().wrap(&collected);
        self.decode_candidate(&synthesized, synthesized.clone())
            .map(ExtractOutcome::PartialMatch)
            .map_err(|source| ExtractError::Undecodable {
                kind: MatchKind::Partial,
                source,
            })
    }

    /// Central modifier cleanup, run once per extraction before anything else.
    ///
    /// Markers always come out bare so they compare equal to the registered
    /// frame glyphs.
    fn normalize(&self, text: &str) -> String {
        if !self.alphabet.is_modifier_sensitive() {
            return normalize_candidate(text, ModifierPolicy::Strip);
        }

        let collapsed = normalize_candidate(text, ModifierPolicy::Collapse);
        let frames = self.registry.frames();
        GlyphScan::new(collapsed)
            .glyphs()
            .map(|glyph| {
                let bare = strip_modifiers(glyph);
                if frames.is_marker(&bare) {
                    bare
                } else {
                    glyph.to_string()
                }
            })
            .collect()
    }

    /// Finds the first complete frame in a single left-to-right pass.
    ///
    /// A frame closes at the next occurrence of its own suffix glyph after a
    /// non-empty inner run. Other marker glyphs inside the run do not end it.
    fn find_full_match(&self, scan: &GlyphScan) -> Option<FrameMatch> {
        let frames = self.registry.frames();
        let n = scan.len();

        // next_at[marker][i] = first position >= i holding `marker`, or n
        let mut next_at: HashMap<&str, Vec<usize>> = frames
            .marker_glyphs()
            .into_iter()
            .map(|marker| (marker, vec![n; n + 1]))
            .collect();
        for (marker, table) in next_at.iter_mut() {
            for i in (0..n).rev() {
                table[i] = if scan.glyph(i) == Some(*marker) { i } else { table[i + 1] };
            }
        }

        let patterns: Vec<(FrameMode, Vec<&str>, Vec<&str>)> = frames
            .framed()
            .map(|frame| (frame.mode, frame.prefix_glyphs(), frame.suffix_glyphs()))
            .collect();

        for start in 0..n {
            let is_marker = scan.glyph(start).is_some_and(|g| next_at.contains_key(g));
            if !is_marker {
                continue;
            }

            for (mode, prefix, suffix) in &patterns {
                if !scan.starts_with_at(start, prefix) {
                    continue;
                }

                let inner_start = start + prefix.len();
                let Some(close) = suffix
                    .first()
                    .and_then(|glyph| next_at.get(glyph))
                    .map(|table| table[inner_start.min(n)])
                else {
                    continue;
                };

                if close > inner_start && close < n && scan.starts_with_at(close, suffix) {
                    return Some(FrameMatch {
                        span: start..close + suffix.len(),
                        mode: *mode,
                    });
                }
            }
        }

        None
    }

    /// Strips the frame from a candidate and decodes the inside.
    fn decode_candidate(
        &self,
        candidate: &str,
        matched_text: String,
    ) -> Result<Extraction, DecoderError> {
        let stripped = self.registry.frames().detect_and_strip(candidate);
        let decoded = decode(stripped.inner, self.alphabet)?;

        Ok(Extraction {
            result: ExtractionResult {
                matched_text,
                inner_payload: stripped.inner.to_string(),
                detected_mode: match stripped.mode {
                    FrameMode::None => None,
                    mode => Some(mode),
                },
            },
            decoded,
        })
    }

    fn partial_frame(&self) -> Frame {
        self.registry
            .frames()
            .get(FrameMode::SingleMarker)
            .cloned()
            .unwrap_or_else(|| Frame::builtin(FrameMode::SingleMarker))
    }
}

/// Convenience wrapper around [`TextExtractor::extract`].
pub fn extract(
    text: &str,
    registry: &GlyphRegistry,
    alphabet: &Alphabet,
) -> Result<ExtractOutcome, ExtractError> {
    TextExtractor::new(registry, alphabet).extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::frame::FrameRegistry;
    use crate::text::tokenize::split_glyphs;

    fn registry() -> GlyphRegistry {
        GlyphRegistry::builtin().unwrap()
    }

    fn framed(registry: &GlyphRegistry, alphabet: &str, mode: FrameMode, data: &[u8]) -> String {
        let alphabet = registry.alphabet(alphabet).unwrap();
        registry.frame(mode).unwrap().wrap(&encode(data, alphabet).unwrap())
    }

    #[test]
    fn test_full_match_in_surrounding_text() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        let payload = framed(&registry, "emoji-64", FrameMode::SingleMarker, b"sku-991");
        let text = format!("xyz{payload}abc");

        match extract(&text, &registry, alphabet).unwrap() {
            ExtractOutcome::FullMatch(found) => {
                assert_eq!(found.decoded.bytes, b"sku-991");
                assert_eq!(found.result.detected_mode, Some(FrameMode::SingleMarker));
                assert!(found.decoded.is_clean());
                assert!(found.result.matched_text.starts_with('✨'));
            }
            other => panic!("expected full match, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_match_without_closing_marker() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        let glyphs = encode(b"sku-991", alphabet).unwrap();
        let text = format!("xyz✨{glyphs}");

        match extract(&text, &registry, alphabet).unwrap() {
            ExtractOutcome::PartialMatch(found) => {
                assert_eq!(found.decoded.bytes, b"sku-991");
                assert_eq!(found.result.detected_mode, Some(FrameMode::SingleMarker));
            }
            other => panic!("expected partial match, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        assert_eq!(
            extract("just some words, nothing else", &registry, alphabet).unwrap(),
            ExtractOutcome::NoMatch
        );
        assert_eq!(extract("", &registry, alphabet).unwrap(), ExtractOutcome::NoMatch);
    }

    #[test]
    fn test_full_match_takes_precedence() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let payload = framed(&registry, "emoji-128", FrameMode::SingleMarker, b"ab");
        // Stray alphabet glyphs around the frame are ignored
        let text = format!("🐶 look {payload} 🐱");

        let outcome = extract(&text, &registry, alphabet).unwrap();
        assert_eq!(outcome.kind(), Some(MatchKind::Full));
        assert_eq!(outcome.bytes(), Some(&b"ab"[..]));
    }

    #[test]
    fn test_first_pair_wins_even_if_undecodable() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let payload = framed(&registry, "emoji-128", FrameMode::SingleMarker, b"ab");
        let text = format!("I ✨love✨ this {payload}");

        let err = extract(&text, &registry, alphabet).unwrap_err();
        assert_eq!(err.kind(), MatchKind::Full);
        assert_eq!(
            err,
            ExtractError::Undecodable {
                kind: MatchKind::Full,
                source: DecoderError::NoValidGlyphs { skipped: 4 },
            }
        );
    }

    #[test]
    fn test_triple_and_lock_frames() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-512").unwrap();
        for mode in [FrameMode::TripleMarker, FrameMode::LockMarker] {
            let payload = framed(&registry, "emoji-512", mode, b"catalog/42");
            let text = format!("see {payload} for details");
            match extract(&text, &registry, alphabet).unwrap() {
                ExtractOutcome::FullMatch(found) => {
                    assert_eq!(found.result.detected_mode, Some(mode));
                    assert_eq!(&found.decoded.bytes[..10], b"catalog/42");
                }
                other => panic!("expected full match for {mode}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unbalanced_triple_falls_back_to_single_pair() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let glyphs = encode(b"ab", alphabet).unwrap();
        let text = format!("✨✨✨{glyphs}✨ tail");

        match extract(&text, &registry, alphabet).unwrap() {
            ExtractOutcome::FullMatch(found) => {
                assert_eq!(found.result.detected_mode, Some(FrameMode::SingleMarker));
                assert_eq!(found.result.inner_payload, glyphs);
                assert_eq!(found.decoded.bytes, b"ab");
            }
            other => panic!("expected full match, got {other:?}"),
        }
    }

    #[test]
    fn test_modifiers_stripped_before_search() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        let glyphs = encode(b"\x01\x02\x03", alphabet).unwrap();
        let sprinkled: String = split_glyphs(&glyphs)
            .into_iter()
            .map(|g| format!("{g}\u{FE0F}"))
            .collect();
        let text = format!("hey ✨\u{FE0F}{sprinkled}✨\u{FE0E} bye");

        let outcome = extract(&text, &registry, alphabet).unwrap();
        assert_eq!(outcome.kind(), Some(MatchKind::Full));
        assert_eq!(outcome.bytes(), Some(&b"\x01\x02\x03"[..]));
        assert!(outcome.extraction().unwrap().decoded.is_clean());
    }

    #[test]
    fn test_marker_without_glyphs_is_undecodable_partial() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        let err = extract("sparkle ✨ but nothing else", &registry, alphabet).unwrap_err();
        assert_eq!(err.kind(), MatchKind::Partial);
    }

    #[test]
    fn test_glyphs_without_markers_are_partial() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let glyphs = encode(b"zz", alphabet).unwrap();
        let text = format!("copied: {glyphs}");

        let outcome = extract(&text, &registry, alphabet).unwrap();
        assert_eq!(outcome.kind(), Some(MatchKind::Partial));
        assert_eq!(outcome.bytes(), Some(&b"zz"[..]));
    }

    #[test]
    fn test_modifier_sensitive_alphabet_keeps_composites() {
        let mut glyphs: Vec<String> = (0x4E00u32..0x4E40)
            .map(|cp| char::from_u32(cp).unwrap().to_string())
            .collect();
        glyphs[0] = "❤".to_string();
        glyphs[1] = "❤\u{FE0F}".to_string();
        let alphabet = Alphabet::new("hearts", glyphs).unwrap();
        let registry = GlyphRegistry::new(vec![alphabet], FrameRegistry::builtin()).unwrap();
        let alphabet = registry.alphabet("hearts").unwrap();

        // Index 1 then index 0: 000001 000000 ...
        let data = [0x04, 0x00, 0x00];
        let encoded = encode(&data, alphabet).unwrap();
        assert!(encoded.starts_with("❤\u{FE0F}❤"));

        let text = format!("a ✨\u{FE0F}{encoded}✨ b");
        let outcome = extract(&text, &registry, alphabet).unwrap();
        assert_eq!(outcome.kind(), Some(MatchKind::Full));
        assert_eq!(outcome.bytes(), Some(&data[..]));
    }

    #[test]
    fn test_composite_variants_on_one_base_survive_extraction() {
        let mut glyphs: Vec<String> = (0x4E00u32..0x4E40)
            .map(|cp| char::from_u32(cp).unwrap().to_string())
            .collect();
        glyphs[0] = "❤\u{FE0E}".to_string();
        glyphs[1] = "❤\u{FE0F}".to_string();
        let alphabet = Alphabet::new("hearts", glyphs).unwrap();
        let registry = GlyphRegistry::new(vec![alphabet], FrameRegistry::builtin()).unwrap();
        let alphabet = registry.alphabet("hearts").unwrap();
        assert!(alphabet.is_modifier_sensitive());

        let data = [0x04, 0x00, 0x00];
        let encoded = encode(&data, alphabet).unwrap();
        assert_eq!(encoded, "❤\u{FE0F}❤\u{FE0E}❤\u{FE0E}❤\u{FE0E}");

        // A pasted duplicate selector keeps the first one
        let noisy = encoded.replacen("❤\u{FE0F}", "❤\u{FE0F}\u{FE0E}", 1);
        let text = format!("a ✨{noisy}✨ b");
        match extract(&text, &registry, alphabet).unwrap() {
            ExtractOutcome::FullMatch(found) => {
                assert_eq!(found.decoded.bytes, data);
                assert!(found.decoded.is_clean());
            }
            other => panic!("expected full match, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_marker_inside_frame_does_not_close_it() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-128").unwrap();
        let glyphs = encode(b"key", alphabet).unwrap();
        let text = format!("xyz✨{glyphs}🔒✨abc");

        match extract(&text, &registry, alphabet).unwrap() {
            ExtractOutcome::FullMatch(found) => {
                assert_eq!(found.result.detected_mode, Some(FrameMode::SingleMarker));
                assert_eq!(found.result.matched_text, format!("✨{glyphs}🔒✨"));
                assert_eq!(found.decoded.bytes, b"key");
                assert_eq!(found.decoded.skipped(), 1);
            }
            other => panic!("expected full match, got {other:?}"),
        }
    }

    #[test]
    fn test_matched_text_is_taken_from_the_input() {
        let registry = registry();
        let alphabet = registry.alphabet("emoji-64").unwrap();
        let glyphs = encode(b"\x01\x02\x03", alphabet).unwrap();
        let sprinkled: String = split_glyphs(&glyphs)
            .into_iter()
            .map(|g| format!("{g}\u{FE0F}"))
            .collect();
        let original = format!("✨\u{FE0F}{sprinkled}✨\u{FE0E}");
        let text = format!("hey {original} bye");

        match extract(&text, &registry, alphabet).unwrap() {
            ExtractOutcome::FullMatch(found) => {
                assert_eq!(found.result.matched_text, original);
                assert_eq!(found.result.inner_payload, glyphs);
            }
            other => panic!("expected full match, got {other:?}"),
        }
    }

    #[test]
    fn test_for_alphabet_selector() {
        let registry = registry();
        let extractor = TextExtractor::for_alphabet(&registry, "128").unwrap();
        let payload = framed(&registry, "emoji-128", FrameMode::LockMarker, b"q");
        let outcome = extractor.extract(&payload).unwrap();
        assert_eq!(outcome.kind(), Some(MatchKind::Full));
        assert!(TextExtractor::for_alphabet(&registry, "99").is_err());
    }
}
