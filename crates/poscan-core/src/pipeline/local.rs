//! Offline collaborators: documents from a directory, text from the PDF text
//! layer.

use std::path::PathBuf;

use glob::glob;
use lopdf::Document as PdfDocument;
use tracing::{debug, trace};

use super::{Document, DocumentKind, DocumentSource, TextRecognizer};
use crate::error::{DocumentError, RecognitionError, Result};
use crate::models::config::SourceConfig;

/// Reads `*.pdf` and `*.txt` files from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    pattern: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pattern: "*".to_string(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.input_dir).with_pattern(config.pattern.clone())
    }

    /// File name glob applied inside the directory.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

impl DocumentSource for DirectorySource {
    fn documents(&self) -> Result<Vec<Document>> {
        if !self.dir.is_dir() {
            return Err(DocumentError::NotFound(self.dir.display().to_string()).into());
        }

        let pattern = self.dir.join(&self.pattern);
        let pattern = pattern.to_string_lossy();
        let mut paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| DocumentError::Pattern(e.to_string()))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let document = Document::new(name, Vec::new());
            if document.kind() == DocumentKind::Other {
                trace!("Skipping {}", path.display());
                continue;
            }
            documents.push(Document {
                bytes: std::fs::read(&path)?,
                ..document
            });
        }

        debug!("Found {} documents in {}", documents.len(), self.dir.display());
        Ok(documents)
    }
}

/// Text from the document itself: page 1 of a PDF's text layer, or a plain
/// text file as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTextRecognizer;

impl EmbeddedTextRecognizer {
    fn pdf_text(&self, data: &[u8]) -> Result<String> {
        let mut doc =
            PdfDocument::load_mem(data).map_err(|e| RecognitionError::Pdf(e.to_string()))?;

        // Documents encrypted with an empty password are still readable
        let mut decrypted = None;
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(RecognitionError::Encrypted.into());
            }
            let mut buf = Vec::new();
            doc.save_to(&mut buf).map_err(|e| {
                RecognitionError::Pdf(format!("failed to save decrypted PDF: {}", e))
            })?;
            decrypted = Some(buf);
        }

        if doc.get_pages().is_empty() {
            return Err(RecognitionError::NoPages.into());
        }

        let first_page = doc.extract_text(&[1]).unwrap_or_default();
        if !first_page.trim().is_empty() {
            return Ok(first_page);
        }

        debug!("Page 1 text layer empty, extracting whole document");
        let raw = decrypted.as_deref().unwrap_or(data);
        pdf_extract::extract_text_from_mem(raw)
            .map_err(|e| RecognitionError::Pdf(e.to_string()).into())
    }
}

impl TextRecognizer for EmbeddedTextRecognizer {
    fn recognize(&self, document: &Document) -> Result<String> {
        match document.kind() {
            DocumentKind::Text => String::from_utf8(document.bytes.clone())
                .map_err(|_| RecognitionError::Encoding.into()),
            DocumentKind::Pdf => self.pdf_text(&document.bytes),
            DocumentKind::Other => {
                Err(DocumentError::Unsupported(document.name.clone()).into())
            }
        }
    }
}
