//! Capacity info command.

use anyhow::{bail, Result};
use clap::Args;

use glyphkey::{capacity_info, max_payload_bytes, FrameMode};

use super::{AppContext, CommandExecutor, PayloadArgs};

/// Show how many glyphs a payload needs in each alphabet.
///
/// Give a size in bytes (--size), an actual payload (--hex, --text, --file),
/// or a glyph budget (--glyphs) to see the largest payload that fits.
#[derive(Args, Debug)]
pub struct InfoCommand {
    /// Payload size in bytes
    #[arg(short, long, conflicts_with_all = ["hex", "text", "file", "glyphs"])]
    pub size: Option<usize>,

    /// Glyph budget to compute the largest payload for
    #[arg(short, long, conflicts_with_all = ["hex", "text", "file"])]
    pub glyphs: Option<usize>,

    #[command(flatten)]
    pub payload: PayloadArgs,

    /// Frame mode used for the framed total
    #[arg(short, long)]
    pub mode: Option<FrameMode>,
}

impl CommandExecutor for InfoCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let mode = self.mode.unwrap_or(ctx.config.mode);
        let frame = ctx.registry.frame(mode)?;

        if let Some(budget) = self.glyphs {
            println!("Largest payload in {budget} glyphs");
            println!("==================================");
            for alphabet in ctx.registry.alphabets() {
                println!(
                    "  {:<12} {} bytes",
                    alphabet.name(),
                    max_payload_bytes(budget, alphabet)
                );
            }
            return Ok(());
        }

        let data_size = if let Some(s) = self.size {
            s
        } else if self.payload.is_given() {
            self.payload.read()?.len()
        } else {
            bail!("Provide --size, --glyphs, or a payload (--hex, --text, --file)");
        };

        println!("Glyph Capacity Analysis");
        println!("=======================");
        println!("  Data size: {data_size} bytes");
        println!("  Frame: {mode}");
        println!();

        for alphabet in ctx.registry.alphabets() {
            let info = capacity_info(data_size, alphabet, frame);
            println!(
                "  {:<12} {:>4} glyphs ({} framed, {} padding bits)",
                alphabet.name(),
                info.glyphs,
                info.framed_glyphs,
                info.padding_bits
            );
        }

        Ok(())
    }
}
