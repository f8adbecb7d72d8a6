//! CLI subcommands.

pub mod config;
pub mod detect;
pub mod parse;
pub mod run;

use std::path::Path;

use poscan_core::{Document, EmbeddedTextRecognizer, TextRecognizer};

/// Read a `.pdf` or `.txt` file and return its text.
pub(crate) fn read_text(path: &Path) -> anyhow::Result<(Document, String)> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let document = Document::new(name, std::fs::read(path)?);
    let text = EmbeddedTextRecognizer.recognize(&document)?;
    Ok((document, text))
}
