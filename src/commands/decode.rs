//! Decode command - recover a payload from a glyph run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use glyphkey::{decode_with_config, DecoderConfig};

use super::{fingerprint, read_text_input, report_warnings, AppContext, CommandExecutor, OutputArgs};

/// Decode a glyph run back into bytes.
///
/// The run may be framed or bare; the frame is detected automatically.
/// Unrecognized glyphs are skipped and reported on stderr.
/// Use `extract` instead when the run is buried in other text.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Glyph text (reads from stdin if neither this nor --input is given)
    pub glyphs: Option<String>,

    /// Read the glyph text from a file
    #[arg(short, long, conflicts_with = "glyphs")]
    pub input: Option<PathBuf>,

    /// Alphabet name or size; must match the one used to encode
    #[arg(short, long)]
    pub alphabet: Option<String>,

    #[command(flatten)]
    pub out: OutputArgs,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let text = read_text_input(self.glyphs.as_deref(), self.input.as_deref())?;

        let config = DecoderConfig {
            alphabet: self
                .alphabet
                .clone()
                .unwrap_or_else(|| ctx.config.alphabet.clone()),
        };

        let framed =
            decode_with_config(&text, &ctx.registry, &config).context("Failed to decode glyphs")?;

        if ctx.verbose {
            eprintln!("Frame: {}", framed.mode);
            eprintln!("Payload: {} bytes", framed.decoded.bytes.len());
            eprintln!("Fingerprint: {}", fingerprint(&framed.decoded.bytes));
        }
        report_warnings(&framed.decoded, ctx.verbose);

        self.out.emit(&framed.decoded.bytes)
    }
}
