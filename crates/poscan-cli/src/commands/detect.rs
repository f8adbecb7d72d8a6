//! Detect command - show the vendor layout for a document.

use std::path::PathBuf;

use clap::Args;
use console::style;

use poscan_core::{detect, VendorGrammar};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input file (.txt or .pdf)
    #[arg(required = true)]
    input: PathBuf,
}

pub fn run(args: DetectArgs) -> anyhow::Result<()> {
    let (_, text) = super::read_text(&args.input)?;
    let grammar = detect(&text);

    println!("{} {}", style("Vendor:").bold(), grammar.vendor());
    Ok(())
}
