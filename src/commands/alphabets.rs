//! Alphabets command - list the registered alphabets.

use anyhow::Result;
use clap::Args;

use super::{AppContext, CommandExecutor};

/// List registered alphabets and frames.
///
/// Pass an alphabet name (or size) to print its glyphs with their indices.
#[derive(Args, Debug)]
pub struct AlphabetsCommand {
    /// Alphabet to print in full
    pub name: Option<String>,
}

impl CommandExecutor for AlphabetsCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        if let Some(name) = &self.name {
            let alphabet = ctx.registry.alphabet(name)?;
            println!("{alphabet}");
            if alphabet.is_modifier_sensitive() {
                println!("  (modifier-sensitive: bare and composite forms differ)");
            }
            println!();
            for (row, chunk) in alphabet.glyphs().chunks(16).enumerate() {
                println!("  {:>3}  {}", row * 16, chunk.join(" "));
            }
            return Ok(());
        }

        println!("Alphabets:");
        for alphabet in ctx.registry.alphabets() {
            let marker = if alphabet.name() == ctx.config.alphabet { " (default)" } else { "" };
            println!("  {alphabet}{marker}");
        }

        println!();
        println!("Frames:");
        for frame in ctx.registry.frames().frames() {
            let marker = if frame.mode == ctx.config.mode { " (default)" } else { "" };
            if frame.is_framed() {
                println!("  {:<14} {}…{}{marker}", frame.mode.name(), frame.prefix, frame.suffix);
            } else {
                println!("  {:<14} (no markers){marker}", frame.mode.name());
            }
        }

        Ok(())
    }
}
