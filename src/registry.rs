//! The process-wide glyph registry.
//!
//! A [`GlyphRegistry`] bundles every alphabet and frame the process knows
//! about. It is built once at startup, validated eagerly, and then only ever
//! read, so one instance can be shared by reference across threads.

use thiserror::Error;
use tracing::debug;

use crate::alphabet::{builtin, Alphabet, AlphabetError, AlphabetSize};
use crate::config::GlyphConfig;
use crate::frame::{Frame, FrameError, FrameMode, FrameRegistry};

/// Errors raised while building or querying the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Alphabet '{0}' is registered twice")]
    DuplicateAlphabet(String),

    #[error("Alphabet '{alphabet}' contains frame marker {glyph:?}")]
    MarkerCollision { alphabet: String, glyph: String },

    #[error("Unknown alphabet '{0}' (use a name or one of 64, 128, 512)")]
    UnknownAlphabet(String),
}

/// All alphabets and frames available to the codec.
#[derive(Debug, Clone)]
pub struct GlyphRegistry {
    alphabets: Vec<Alphabet>,
    frames: FrameRegistry,
}

impl GlyphRegistry {
    /// Builds a registry from validated parts.
    ///
    /// Fails if two alphabets share a name or if any alphabet resolves a
    /// frame marker glyph, since markers must stay recognizable in text.
    pub fn new(alphabets: Vec<Alphabet>, frames: FrameRegistry) -> Result<Self, RegistryError> {
        for (i, alphabet) in alphabets.iter().enumerate() {
            if alphabets[..i].iter().any(|a| a.name() == alphabet.name()) {
                return Err(RegistryError::DuplicateAlphabet(alphabet.name().to_string()));
            }

            if let Some(marker) = frames
                .marker_glyphs()
                .into_iter()
                .find(|marker| alphabet.contains(marker))
            {
                return Err(RegistryError::MarkerCollision {
                    alphabet: alphabet.name().to_string(),
                    glyph: marker.to_string(),
                });
            }
        }

        debug!(
            alphabets = alphabets.len(),
            frames = frames.frames().len(),
            "glyph registry ready"
        );

        Ok(Self { alphabets, frames })
    }

    /// The built-in alphabets and frames.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin::all()?, FrameRegistry::builtin())
    }

    /// The built-ins plus the custom alphabets declared in `config`.
    pub fn from_config(config: &GlyphConfig) -> Result<Self, RegistryError> {
        let mut alphabets = builtin::all()?;
        for custom in &config.alphabets {
            alphabets.push(Alphabet::new(custom.name.clone(), custom.glyphs.iter().cloned())?);
        }
        Self::new(alphabets, FrameRegistry::builtin())
    }

    /// All alphabets in registration order.
    pub fn alphabets(&self) -> &[Alphabet] {
        &self.alphabets
    }

    /// The frame registry.
    pub fn frames(&self) -> &FrameRegistry {
        &self.frames
    }

    /// Looks an alphabet up by name, or by size (`"64"`, `"128"`, `"512"`).
    ///
    /// A size selects the first registered alphabet of that size.
    pub fn alphabet(&self, selector: &str) -> Result<&Alphabet, RegistryError> {
        let selector = selector.trim();

        if let Some(alphabet) = self.alphabets.iter().find(|a| a.name() == selector) {
            return Ok(alphabet);
        }

        selector
            .parse::<usize>()
            .ok()
            .and_then(|count| AlphabetSize::try_from(count).ok())
            .and_then(|size| self.alphabets.iter().find(|a| a.size_class() == size))
            .ok_or_else(|| RegistryError::UnknownAlphabet(selector.to_string()))
    }

    /// The frame registered for `mode`.
    pub fn frame(&self, mode: FrameMode) -> Result<&Frame, RegistryError> {
        self.frames
            .get(mode)
            .ok_or_else(|| FrameError::UnknownMode(mode.to_string()).into())
    }

    /// Returns true if the glyph resolves in any registered alphabet.
    pub fn is_alphabet_glyph(&self, glyph: &str) -> bool {
        self.alphabets.iter().any(|alphabet| alphabet.contains(glyph))
    }
}
