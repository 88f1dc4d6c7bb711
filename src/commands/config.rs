//! Config command - show or initialize the configuration file.

use anyhow::{bail, Context, Result};
use clap::Args;

use glyphkey::GlyphConfig;

use super::{AppContext, CommandExecutor};

/// Show the active configuration, or write a default one.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Write the default configuration to the config path
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

impl CommandExecutor for ConfigCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let path = &ctx.config_path;

        if self.init {
            if path.exists() && !self.force {
                bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            GlyphConfig::default()
                .save_to(path)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            println!("Wrote default config to {}", path.display());
            return Ok(());
        }

        let state = if path.exists() { "" } else { " (not found, using defaults)" };
        println!("Config: {}{state}", path.display());
        println!("  alphabet = {}", ctx.config.alphabet);
        println!("  mode = {}", ctx.config.mode);
        for custom in &ctx.config.alphabets {
            println!("  custom alphabet: {} ({} glyphs)", custom.name, custom.glyphs.len());
        }

        Ok(())
    }
}
