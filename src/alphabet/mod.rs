//! Glyph alphabets.
//!
//! An [`Alphabet`] is an ordered list of distinct glyphs whose size is 64, 128
//! or 512, together with the reverse glyph -> index map. Alphabets are
//! validated when they are built and never change afterwards.
//!
//! Lookup is forgiving about presentation modifiers: when a glyph is not
//! registered exactly, an ordered chain of fallback transforms is tried and
//! the first registered candidate wins.

pub mod builtin;

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::text::tokenize::{
    glyph_spans, normalize_candidate, strip_modifiers, ModifierPolicy, EMOJI_PRESENTATION,
};

/// Errors raised while building or indexing an alphabet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("Alphabet '{name}' has {count} glyphs, expected 64, 128 or 512")]
    InvalidSize { name: String, count: usize },

    #[error("Alphabet '{name}' has an empty glyph at position {position}")]
    EmptyGlyph { name: String, position: usize },

    #[error("Alphabet '{name}' glyph {glyph:?} at position {position} is not a single glyph")]
    MalformedGlyph {
        name: String,
        position: usize,
        glyph: String,
    },

    #[error("Alphabet '{name}' repeats glyph {glyph:?} at positions {first} and {second}")]
    DuplicateGlyph {
        name: String,
        glyph: String,
        first: usize,
        second: usize,
    },

    #[error("Glyph index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
}

/// The supported alphabet sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlphabetSize {
    /// 64 glyphs, 6 bits per glyph.
    Glyphs64,
    /// 128 glyphs, 7 bits per glyph.
    Glyphs128,
    /// 512 glyphs, 9 bits per glyph.
    Glyphs512,
}

impl AlphabetSize {
    /// Number of glyphs.
    pub fn glyph_count(self) -> usize {
        match self {
            Self::Glyphs64 => 64,
            Self::Glyphs128 => 128,
            Self::Glyphs512 => 512,
        }
    }

    /// Bits carried by one glyph.
    pub fn bits_per_glyph(self) -> u8 {
        match self {
            Self::Glyphs64 => 6,
            Self::Glyphs128 => 7,
            Self::Glyphs512 => 9,
        }
    }
}

impl TryFrom<usize> for AlphabetSize {
    type Error = usize;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        match count {
            64 => Ok(Self::Glyphs64),
            128 => Ok(Self::Glyphs128),
            512 => Ok(Self::Glyphs512),
            other => Err(other),
        }
    }
}

impl fmt::Display for AlphabetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph_count())
    }
}

/// A pure function producing an alternative lookup key for a glyph.
type LookupTransform = fn(&str) -> String;

fn first_modifier(glyph: &str) -> String {
    normalize_candidate(glyph, ModifierPolicy::Collapse)
}

fn emoji_presentation(glyph: &str) -> String {
    let mut out = strip_modifiers(glyph);
    out.push(EMOJI_PRESENTATION);
    out
}

fn nfc(glyph: &str) -> String {
    glyph.nfc().collect()
}

fn nfd(glyph: &str) -> String {
    glyph.nfd().collect()
}

fn nfkc(glyph: &str) -> String {
    glyph.nfkc().collect()
}

fn nfkd(glyph: &str) -> String {
    glyph.nfkd().collect()
}

/// Fallbacks tried in order after an exact lookup misses.
///
/// Registered glyphs are a single codepoint plus modifiers, so the decomposing
/// forms only produce a registered key where the composing forms already did.
const LOOKUP_FALLBACKS: [LookupTransform; 7] = [
    first_modifier,
    strip_modifiers,
    emoji_presentation,
    nfc,
    nfd,
    nfkc,
    nfkd,
];

/// An immutable, validated glyph alphabet.
#[derive(Debug, Clone)]
pub struct Alphabet {
    name: String,
    size: AlphabetSize,
    glyphs: Vec<String>,
    index: HashMap<String, u16>,
    modifier_sensitive: bool,
}

impl Alphabet {
    /// Builds an alphabet from an ordered glyph list.
    ///
    /// Fails if the count is not 64, 128 or 512, if a glyph is empty or is
    /// more than one logical glyph, or if any glyph repeats.
    pub fn new<I, S>(name: impl Into<String>, glyphs: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let glyphs: Vec<String> = glyphs.into_iter().map(Into::into).collect();

        let size = AlphabetSize::try_from(glyphs.len()).map_err(|count| {
            AlphabetError::InvalidSize {
                name: name.clone(),
                count,
            }
        })?;

        let mut index: HashMap<String, u16> = HashMap::with_capacity(glyphs.len());

        for (position, glyph) in glyphs.iter().enumerate() {
            if glyph.is_empty() {
                return Err(AlphabetError::EmptyGlyph {
                    name: name.clone(),
                    position,
                });
            }

            let spans = glyph_spans(glyph);
            if spans.len() != 1 || spans[0] != (0..glyph.len()) {
                return Err(AlphabetError::MalformedGlyph {
                    name: name.clone(),
                    position,
                    glyph: glyph.clone(),
                });
            }

            if let Some(&first) = index.get(glyph) {
                return Err(AlphabetError::DuplicateGlyph {
                    name: name.clone(),
                    glyph: glyph.clone(),
                    first: first as usize,
                    second: position,
                });
            }

            index.insert(glyph.clone(), position as u16);
        }

        let mut bases: HashSet<String> = HashSet::with_capacity(glyphs.len());
        let modifier_sensitive = !glyphs.iter().all(|g| bases.insert(strip_modifiers(g)));

        Ok(Self {
            name,
            size,
            glyphs,
            index,
            modifier_sensitive,
        })
    }

    /// The alphabet's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of glyphs (64, 128 or 512).
    pub fn size(&self) -> usize {
        self.size.glyph_count()
    }

    /// The size class.
    pub fn size_class(&self) -> AlphabetSize {
        self.size
    }

    /// Bits carried by one glyph (6, 7 or 9).
    pub fn bits_per_glyph(&self) -> u8 {
        self.size.bits_per_glyph()
    }

    /// All glyphs in index order.
    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    /// True when two registered glyphs share a base and differ only in modifiers.
    ///
    /// Such alphabets need modifiers preserved during extraction.
    pub fn is_modifier_sensitive(&self) -> bool {
        self.modifier_sensitive
    }

    /// The glyph at `index`.
    pub fn glyph_at(&self, index: usize) -> Result<&str, AlphabetError> {
        self.glyphs
            .get(index)
            .map(String::as_str)
            .ok_or(AlphabetError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Resolves a glyph to its index.
    ///
    /// Tries the exact glyph first, then each fallback in order: first
    /// modifier only, modifiers stripped, emoji presentation form, NFC, NFD,
    /// NFKC, NFKD. When a glyph carries several modifiers the first one wins.
    pub fn index_of(&self, glyph: &str) -> Option<u16> {
        if let Some(&index) = self.index.get(glyph) {
            return Some(index);
        }

        LOOKUP_FALLBACKS.iter().find_map(|transform| {
            let candidate = transform(glyph);
            if candidate == glyph {
                return None;
            }
            self.index.get(&candidate).copied()
        })
    }

    /// Returns true if the glyph resolves in this alphabet.
    pub fn contains(&self, glyph: &str) -> bool {
        self.index_of(glyph).is_some()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} glyphs, {} bits/glyph)",
            self.name,
            self.size(),
            self.bits_per_glyph()
        )
    }
}
