//! Configuration for glyphkey.
//!
//! Defaults and custom alphabets are stored in `~/.glyphkey/config.toml`.
//! A missing file means built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::alphabet::builtin::EMOJI_64;
use crate::frame::FrameMode;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// A user-defined alphabet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CustomAlphabet {
    /// Name used to select the alphabet.
    pub name: String,

    /// Glyphs in index order; must be 64, 128 or 512 distinct glyphs.
    pub glyphs: Vec<String>,
}

/// Settings read from `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GlyphConfig {
    /// Default alphabet (name or size).
    pub alphabet: String,

    /// Default frame mode for encoding.
    pub mode: FrameMode,

    /// Extra alphabets registered after the built-ins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alphabets: Vec<CustomAlphabet>,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            alphabet: EMOJI_64.to_string(),
            mode: FrameMode::default(),
            alphabets: Vec::new(),
        }
    }
}

impl GlyphConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: GlyphConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Path to the default configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join(CONFIG_FILE))
    }
}

/// Gets the glyphkey config directory (`~/.glyphkey`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".glyphkey"))
        .ok_or(ConfigError::NoConfigDir)
}
