//! Core library for purchase-order OCR processing.
//!
//! This crate provides:
//! - Vendor detection and vendor-specific grammars for OCR'd PO text
//! - Numeric normalization of OCR'd quantities and amounts
//! - Line-item models and spreadsheet row building
//! - A document pipeline with pluggable sources, recognizers and sheet writers

pub mod error;
pub mod models;
pub mod pipeline;
pub mod po;
pub mod sheet;

pub use error::{PoscanError, Result};
pub use models::config::PoscanConfig;
pub use models::po::{LineItem, Vendor};
pub use pipeline::{
    BatchReport, Document, DocumentReport, DocumentSource, OcrService, PageConverter, Pipeline,
    RasterOcr, SheetWriter, TextRecognizer,
};
#[cfg(feature = "native")]
pub use pipeline::{DirectorySource, EmbeddedTextRecognizer};
pub use po::{detect, parse, ExtractionResult, PurchaseOrderParser, RuleBasedParser, VendorGrammar};
pub use sheet::CsvSheet;
