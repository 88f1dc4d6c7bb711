//! glyphkey - Bytes as emoji
//!
//! A CLI for encoding short payloads as Unicode glyph runs and recovering
//! them from text they were pasted into.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use glyphkey::{GlyphConfig, GlyphRegistry};

use commands::{
    AlphabetsCommand, AppContext, CommandExecutor, ConfigCommand, DecodeCommand, EncodeCommand,
    ExtractCommand, InfoCommand,
};

/// glyphkey - Bytes as emoji
///
/// Encodes opaque payloads (ids, lookup keys, tokens) as runs of glyphs from a
/// 64, 128 or 512 glyph alphabet, optionally framed so they can be found again
/// inside free text.
#[derive(Parser)]
#[command(name = "glyphkey")]
#[command(version)]
#[command(about = "Encode bytes as Unicode glyph runs and recover them from noisy text")]
#[command(long_about = None)]
struct Cli {
    /// Verbose output (details on stderr, debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: ~/.glyphkey/config.toml)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a payload as a glyph run
    Encode(EncodeCommand),

    /// Decode a (framed) glyph run back into bytes
    Decode(DecodeCommand),

    /// Find and decode a payload inside arbitrary text
    Extract(ExtractCommand),

    /// List alphabets and frames, or print one alphabet
    Alphabets(AlphabetsCommand),

    /// Show glyph capacity for a payload size
    Info(InfoCommand),

    /// Show or initialize the configuration
    Config(ConfigCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Encode(cmd) => cmd,
            Commands::Decode(cmd) => cmd,
            Commands::Extract(cmd) => cmd,
            Commands::Alphabets(cmd) => cmd,
            Commands::Info(cmd) => cmd,
            Commands::Config(cmd) => cmd,
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config_path = match cli.config_file {
        Some(path) => path,
        None => GlyphConfig::config_path()?,
    };
    let config = GlyphConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    // Built once and validated before any command runs
    let registry = GlyphRegistry::from_config(&config).context("Invalid glyph configuration")?;

    let ctx = AppContext {
        registry,
        config,
        config_path,
        verbose: cli.verbose,
    };

    cli.command.executor().execute(&ctx)
}
