//! Error types for the poscan-core library.
//!
//! Parsing itself never fails; these errors come from the collaborators
//! around it (document sources, text recognition, sheet writers).

use thiserror::Error;

/// Main error type for the poscan library.
#[derive(Error, Debug)]
pub enum PoscanError {
    /// Document source error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Text recognition error.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Spreadsheet writer error.
    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to locating and reading documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The source location does not exist.
    #[error("source not found: {0}")]
    NotFound(String),

    /// Invalid glob pattern.
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// Unsupported document type.
    #[error("unsupported document type: {0}")]
    Unsupported(String),
}

/// Errors related to turning a document into text.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Page conversion failed.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// OCR service failed.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// Text was not valid UTF-8.
    #[error("document text is not valid UTF-8")]
    Encoding,
}

/// Errors related to writing rows.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The target sheet could not be opened.
    #[error("cannot open sheet {path}: {reason}")]
    Open { path: String, reason: String },
}

/// Result type for the poscan library.
pub type Result<T> = std::result::Result<T, PoscanError>;
