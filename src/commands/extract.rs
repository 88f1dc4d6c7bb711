//! Extract command - find and decode a payload inside arbitrary text.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use glyphkey::{ExtractOutcome, TextExtractor};

use super::{fingerprint, read_text_input, report_warnings, AppContext, CommandExecutor, OutputArgs};

/// Find a glyph run in noisy text and decode it.
///
/// A complete frame is preferred. Without one, every alphabet glyph in the
/// text is collected and decoded on a best-effort basis (partial match).
/// Exits with an error when the text holds no payload at all.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Text to search (reads from stdin if neither this nor --input is given)
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Alphabet name or size; must match the one used to encode
    #[arg(short, long)]
    pub alphabet: Option<String>,

    #[command(flatten)]
    pub out: OutputArgs,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let text = read_text_input(self.text.as_deref(), self.input.as_deref())?;
        let selector = self.alphabet.as_deref().unwrap_or(&ctx.config.alphabet);

        let extractor = TextExtractor::for_alphabet(&ctx.registry, selector)?;
        let outcome = extractor
            .extract(&text)
            .context("Failed to decode the located payload")?;

        let (label, extraction) = match &outcome {
            ExtractOutcome::FullMatch(e) => ("Full match", e),
            ExtractOutcome::PartialMatch(e) => ("Partial match (best effort)", e),
            ExtractOutcome::NoMatch => bail!("No payload found in the text"),
        };

        eprintln!("{label}");
        if ctx.verbose {
            let mode = extraction
                .result
                .detected_mode
                .map_or_else(|| "none".to_string(), |m| m.to_string());
            eprintln!("Frame: {mode}");
            eprintln!("Matched: {}", extraction.result.matched_text);
            eprintln!("Payload: {} bytes", extraction.decoded.bytes.len());
            eprintln!("Fingerprint: {}", fingerprint(&extraction.decoded.bytes));
        }
        report_warnings(&extraction.decoded, ctx.verbose);

        self.out.emit(&extraction.decoded.bytes)
    }
}
