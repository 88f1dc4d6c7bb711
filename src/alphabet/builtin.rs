//! Built-in glyph alphabets.
//!
//! None of these alphabets may contain a frame marker glyph (`✨`, `🔑`, `🔒`);
//! the registry rejects such collisions at startup.

use std::ops::RangeInclusive;

use super::{Alphabet, AlphabetError};

/// Name of the built-in 64-glyph alphabet.
pub const EMOJI_64: &str = "emoji-64";

/// Name of the built-in 128-glyph alphabet.
pub const EMOJI_128: &str = "emoji-128";

/// Name of the built-in 512-glyph alphabet.
pub const EMOJI_512: &str = "emoji-512";

/// Hand-picked glyphs for the 64-symbol alphabet.
///
/// The first twelve are composite: a base symbol plus the emoji presentation
/// selector, the way most keyboards emit them.
const EMOJI_64_GLYPHS: [&str; 64] = [
    "❤\u{FE0F}", "☀\u{FE0F}", "❄\u{FE0F}", "☂\u{FE0F}", "✈\u{FE0F}", "☎\u{FE0F}", "✂\u{FE0F}", "✏\u{FE0F}",
    "☘\u{FE0F}", "♻\u{FE0F}", "⚙\u{FE0F}", "✌\u{FE0F}", "⚡", "⭐", "☕", "⚽",
    "⛄", "⌛", "⏰", "🌈", "🌊", "🌋", "🌍", "🌙",
    "🌵", "🌷", "🌻", "🍀", "🍁", "🍄", "🍇", "🍉",
    "🍋", "🍌", "🍍", "🍎", "🍓", "🍕", "🍪", "🎀",
    "🎁", "🎈", "🎨", "🎲", "🎸", "🏀", "🏆", "🏠",
    "🐝", "🐢", "🐬", "🐳", "🐸", "🐼", "👑", "💎",
    "💡", "📌", "🔔", "🔥", "🚀", "🦄", "🦋", "🧩",
];

/// Animals and body parts, U+1F400..=U+1F47F.
const EMOJI_128_RANGES: &[RangeInclusive<u32>] = &[0x1F400..=0x1F47F];

/// Miscellaneous pictographs without the skin-tone modifiers U+1F3FB..=U+1F3FF.
const EMOJI_512_RANGES: &[RangeInclusive<u32>] = &[0x1F300..=0x1F3FA, 0x1F400..=0x1F504];

fn glyphs_from_ranges(ranges: &[RangeInclusive<u32>]) -> Vec<String> {
    ranges
        .iter()
        .flat_map(|range| range.clone())
        .filter_map(char::from_u32)
        .map(String::from)
        .collect()
}

/// Builds the 64-glyph alphabet.
pub fn emoji_64() -> Result<Alphabet, AlphabetError> {
    Alphabet::new(EMOJI_64, EMOJI_64_GLYPHS.iter().map(|g| g.to_string()))
}

/// Builds the 128-glyph alphabet.
pub fn emoji_128() -> Result<Alphabet, AlphabetError> {
    Alphabet::new(EMOJI_128, glyphs_from_ranges(EMOJI_128_RANGES))
}

/// Builds the 512-glyph alphabet.
pub fn emoji_512() -> Result<Alphabet, AlphabetError> {
    Alphabet::new(EMOJI_512, glyphs_from_ranges(EMOJI_512_RANGES))
}

/// Builds every built-in alphabet, smallest first.
pub fn all() -> Result<Vec<Alphabet>, AlphabetError> {
    Ok(vec![emoji_64()?, emoji_128()?, emoji_512()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_sizes() {
        assert_eq!(emoji_64().unwrap().size(), 64);
        assert_eq!(emoji_128().unwrap().size(), 128);
        assert_eq!(emoji_512().unwrap().size(), 512);
    }

    #[test]
    fn test_builtin_glyphs_pairwise_distinct() {
        for alphabet in all().unwrap() {
            let unique: HashSet<&str> = alphabet.glyphs().iter().map(String::as_str).collect();
            assert_eq!(unique.len(), alphabet.size(), "{}", alphabet.name());
        }
    }

    #[test]
    fn test_512_skips_skin_tones() {
        let alphabet = emoji_512().unwrap();
        for cp in 0x1F3FBu32..=0x1F3FF {
            let glyph = char::from_u32(cp).unwrap().to_string();
            assert!(!alphabet.contains(&glyph));
        }
    }

    #[test]
    fn test_builtins_are_not_modifier_sensitive() {
        for alphabet in all().unwrap() {
            assert!(!alphabet.is_modifier_sensitive(), "{}", alphabet.name());
        }
    }
}
