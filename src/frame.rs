//! Delimiter framing ("magic modes").
//!
//! A [`Frame`] wraps an encoded glyph run in a prefix/suffix marker pair so
//! it can be found again inside free text. The [`FrameRegistry`] holds every
//! known frame in detection priority order, longest markers first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::text::tokenize::split_glyphs;

/// The single marker glyph.
pub const SPARKLE: &str = "✨";

/// Opening glyph of the lock frame.
pub const KEY: &str = "🔑";

/// Closing glyph of the lock frame.
pub const LOCK: &str = "🔒";

/// Errors raised by frame lookup and registry validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Unknown frame mode '{0}' (expected none, single-marker, triple-marker or lock-marker)")]
    UnknownMode(String),

    #[error("Frame mode '{0}' is registered twice")]
    DuplicateMode(FrameMode),

    #[error("Frame mode '{0}' must have both a prefix and a suffix")]
    EmptyMarker(FrameMode),
}

/// The named framing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameMode {
    /// No framing, the glyph run is emitted as is.
    None,
    /// `✨…✨`
    SingleMarker,
    /// `✨✨✨…✨✨✨`
    TripleMarker,
    /// `🔑…🔒`
    LockMarker,
}

impl FrameMode {
    /// All modes, in the order they are listed to users.
    pub const ALL: [FrameMode; 4] = [
        FrameMode::None,
        FrameMode::SingleMarker,
        FrameMode::TripleMarker,
        FrameMode::LockMarker,
    ];

    /// The mode's name as used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            FrameMode::None => "none",
            FrameMode::SingleMarker => "single-marker",
            FrameMode::TripleMarker => "triple-marker",
            FrameMode::LockMarker => "lock-marker",
        }
    }
}

impl Default for FrameMode {
    fn default() -> Self {
        Self::SingleMarker
    }
}

impl fmt::Display for FrameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrameMode {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FrameMode::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| FrameError::UnknownMode(s.to_string()))
    }
}

/// A prefix/suffix pair bound to a mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub mode: FrameMode,
    pub prefix: String,
    pub suffix: String,
}

impl Frame {
    /// Creates a frame.
    pub fn new(mode: FrameMode, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            mode,
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The built-in frame for a mode.
    pub fn builtin(mode: FrameMode) -> Self {
        match mode {
            FrameMode::None => Frame::new(mode, "", ""),
            FrameMode::SingleMarker => Frame::new(mode, SPARKLE, SPARKLE),
            FrameMode::TripleMarker => Frame::new(mode, SPARKLE.repeat(3), SPARKLE.repeat(3)),
            FrameMode::LockMarker => Frame::new(mode, KEY, LOCK),
        }
    }

    /// True when both prefix and suffix are non-empty.
    pub fn is_framed(&self) -> bool {
        !self.prefix.is_empty() && !self.suffix.is_empty()
    }

    /// Wraps a glyph run: `prefix + glyphs + suffix`.
    pub fn wrap(&self, glyphs: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + glyphs.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(glyphs);
        out.push_str(&self.suffix);
        out
    }

    /// Prefix split into logical glyphs.
    pub fn prefix_glyphs(&self) -> Vec<&str> {
        split_glyphs(&self.prefix)
    }

    /// Suffix split into logical glyphs.
    pub fn suffix_glyphs(&self) -> Vec<&str> {
        split_glyphs(&self.suffix)
    }

    /// Strips this frame if `text` starts with the prefix and ends with the suffix.
    fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !self.is_framed() || text.len() < self.prefix.len() + self.suffix.len() {
            return None;
        }
        text.strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }
}

/// The inner text of a framed string and the mode that framed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stripped<'a> {
    pub inner: &'a str,
    pub mode: FrameMode,
}

/// Every registered frame, in detection priority order.
#[derive(Debug, Clone)]
pub struct FrameRegistry {
    frames: Vec<Frame>,
}

impl FrameRegistry {
    /// Builds a registry, sorting framed modes longest markers first.
    ///
    /// The `none` frame is always present and always last.
    pub fn new(frames: Vec<Frame>) -> Result<Self, FrameError> {
        let mut seen: Vec<FrameMode> = Vec::with_capacity(frames.len() + 1);
        let mut framed: Vec<Frame> = Vec::with_capacity(frames.len());

        for frame in frames {
            if seen.contains(&frame.mode) {
                return Err(FrameError::DuplicateMode(frame.mode));
            }
            seen.push(frame.mode);

            if frame.mode == FrameMode::None {
                continue;
            }
            if !frame.is_framed() {
                return Err(FrameError::EmptyMarker(frame.mode));
            }
            framed.push(frame);
        }

        // Stable: equal lengths keep registration order
        framed.sort_by_key(|frame| std::cmp::Reverse(frame.prefix.len() + frame.suffix.len()));
        framed.push(Frame::builtin(FrameMode::None));

        Ok(Self { frames: framed })
    }

    /// The built-in frames: triple-marker, lock-marker, single-marker, none.
    pub fn builtin() -> Self {
        Self {
            frames: vec![
                Frame::builtin(FrameMode::TripleMarker),
                Frame::builtin(FrameMode::LockMarker),
                Frame::builtin(FrameMode::SingleMarker),
                Frame::builtin(FrameMode::None),
            ],
        }
    }

    /// All frames in priority order, `none` last.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frames with non-empty prefix and suffix, in priority order.
    pub fn framed(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|frame| frame.is_framed())
    }

    /// The frame registered for `mode`.
    pub fn get(&self, mode: FrameMode) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.mode == mode)
    }

    /// Returns true if the glyph occurs in any framed mode's markers.
    pub fn is_marker(&self, glyph: &str) -> bool {
        self.framed().any(|frame| {
            frame
                .prefix_glyphs()
                .into_iter()
                .chain(frame.suffix_glyphs())
                .any(|marker| marker == glyph)
        })
    }

    /// Every distinct marker glyph.
    pub fn marker_glyphs(&self) -> Vec<&str> {
        let mut markers: Vec<&str> = Vec::new();
        for frame in self.framed() {
            for glyph in frame.prefix_glyphs().into_iter().chain(frame.suffix_glyphs()) {
                if !markers.contains(&glyph) {
                    markers.push(glyph);
                }
            }
        }
        markers
    }

    /// Detects the frame around `text` and strips it.
    ///
    /// Framed modes are tried in priority order; the first whose prefix sits
    /// at the very start and suffix at the very end wins. Falls through to
    /// `none` with the text unchanged.
    pub fn detect_and_strip<'a>(&self, text: &'a str) -> Stripped<'a> {
        for frame in self.framed() {
            if let Some(inner) = frame.strip(text) {
                debug!(mode = %frame.mode, "detected frame");
                return Stripped {
                    inner,
                    mode: frame.mode,
                };
            }
        }

        Stripped {
            inner: text,
            mode: FrameMode::None,
        }
    }
}

impl Default for FrameRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
