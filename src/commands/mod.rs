//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Shared input and output handling lives here.

mod alphabets;
mod config;
mod decode;
mod encode;
mod extract;
mod info;

pub use alphabets::AlphabetsCommand;
pub use config::ConfigCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use extract::ExtractCommand;
pub use info::InfoCommand;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sha2::{Digest, Sha256};

use glyphkey::{DecodeResult, GlyphConfig, GlyphRegistry};

/// Everything a command needs besides its own arguments.
pub struct AppContext {
    /// Registry built once at startup from the configuration.
    pub registry: GlyphRegistry,
    /// The loaded configuration.
    pub config: GlyphConfig,
    /// Where the configuration was loaded from.
    pub config_path: PathBuf,
    /// Print extra details on stderr.
    pub verbose: bool,
}

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Where a payload comes from.
#[derive(Args, Debug)]
#[group(multiple = false)]
pub struct PayloadArgs {
    /// Payload as hex (e.g. "00ff1a")
    #[arg(long)]
    pub hex: Option<String>,

    /// Payload as UTF-8 text
    #[arg(short, long)]
    pub text: Option<String>,

    /// Read the payload bytes from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    /// Returns true if any payload source was given.
    pub fn is_given(&self) -> bool {
        self.hex.is_some() || self.text.is_some() || self.file.is_some()
    }

    /// Reads the payload bytes. Falls back to stdin text when nothing was given.
    pub fn read(&self) -> Result<Vec<u8>> {
        if let Some(h) = &self.hex {
            return hex::decode(h.trim()).context("Invalid hex payload");
        }
        if let Some(t) = &self.text {
            return Ok(t.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .with_context(|| format!("Failed to read payload file: {}", path.display()));
        }
        Ok(read_stdin("payload")?.into_bytes())
    }
}

/// How decoded bytes are printed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lowercase hex
    #[default]
    Hex,
    /// UTF-8 text (lossy)
    Text,
}

/// Where decoded bytes go.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Write raw bytes to this file instead of printing
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How to print the bytes on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Hex)]
    pub format: OutputFormat,
}

impl OutputArgs {
    /// Writes or prints the decoded bytes.
    pub fn emit(&self, bytes: &[u8]) -> Result<()> {
        match &self.output {
            Some(path) => {
                fs::write(path, bytes)
                    .with_context(|| format!("Failed to write output: {}", path.display()))?;
                eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
            }
            None => match self.format {
                OutputFormat::Hex => println!("{}", hex::encode(bytes)),
                OutputFormat::Text => println!("{}", String::from_utf8_lossy(bytes)),
            },
        }
        Ok(())
    }
}

/// Reads glyph text from the argument, a file, or stdin.
pub fn read_text_input(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t.to_string());
    }
    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }
    read_stdin("text")
}

fn read_stdin(what: &str) -> Result<String> {
    eprintln!("Reading {what} from stdin (Ctrl+D to finish):");
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .with_context(|| format!("Failed to read {what} from stdin"))?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

/// Short SHA-256 fingerprint of a payload, for comparing across machines.
pub fn fingerprint(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hash[..8]
        .chunks(2)
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(":")
}

/// Prints skipped glyph warnings on stderr.
pub fn report_warnings(decoded: &DecodeResult, verbose: bool) {
    if decoded.is_clean() {
        return;
    }
    eprintln!("Warning: skipped {} unrecognized glyph(s)", decoded.skipped());
    if verbose {
        for warning in &decoded.warnings {
            eprintln!("  - {warning}");
        }
    }
}
