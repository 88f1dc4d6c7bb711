//! Encode command - turn a payload into a glyph run.

use anyhow::{Context, Result};
use clap::Args;

use glyphkey::{encode_with_config, EncoderConfig, FrameMode};

use super::{fingerprint, AppContext, CommandExecutor, PayloadArgs};

/// Encode bytes as a glyph run.
///
/// The payload can be given as hex (--hex), text (--text), a file (--file),
/// or piped on stdin. The glyph text is printed on stdout, ready to paste.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    #[command(flatten)]
    pub payload: PayloadArgs,

    /// Alphabet name or size (64, 128, 512). Defaults to the configured one.
    #[arg(short, long)]
    pub alphabet: Option<String>,

    /// Frame mode: none, single-marker, triple-marker or lock-marker
    #[arg(short, long)]
    pub mode: Option<FrameMode>,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let data = self.payload.read()?;

        let config = EncoderConfig {
            alphabet: self
                .alphabet
                .clone()
                .unwrap_or_else(|| ctx.config.alphabet.clone()),
            mode: self.mode.unwrap_or(ctx.config.mode),
        };

        let encoded =
            encode_with_config(&data, &ctx.registry, &config).context("Failed to encode payload")?;

        if ctx.verbose {
            eprintln!("Alphabet: {}", encoded.alphabet);
            eprintln!("Frame: {}", encoded.mode);
            eprintln!("Payload: {} bytes -> {} glyphs", data.len(), encoded.glyph_count);
            eprintln!("Fingerprint: {}", fingerprint(&data));
        }

        println!("{}", encoded.text);
        Ok(())
    }
}
