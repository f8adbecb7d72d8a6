//! Document pipeline: source -> text -> line items -> sheet.
//!
//! Everything outside the parser is a collaborator trait so hosted services
//! (cloud storage, conversion APIs, OCR APIs, spreadsheet APIs) and the local
//! implementations in [`local`] plug into the same driver.

#[cfg(feature = "native")]
pub mod local;

#[cfg(feature = "native")]
pub use local::{DirectorySource, EmbeddedTextRecognizer};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{DocumentError, RecognitionError, Result};
use crate::models::config::{ConversionSettings, PoscanConfig};
use crate::models::po::{LineItem, Vendor};
use crate::po::{ExtractionResult, PurchaseOrderParser, RuleBasedParser};
use crate::sheet::AppendSummary;

lazy_static! {
    static ref OUTER_PO: Regex = Regex::new(r"(?i)SFWW\s*PO\s*#\s*(\d+)").unwrap();
}

/// Upstream PO id encoded in a file name (`"SFWW PO# 12345.pdf"` -> `"12345"`).
pub fn outer_po_from_name(name: &str) -> Option<String> {
    OUTER_PO.captures(name).map(|caps| caps[1].to_string())
}

/// Kind of document, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Text,
    Other,
}

/// A document fetched from a source.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name, including extension.
    pub name: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        let ext = std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "txt" => DocumentKind::Text,
            _ => DocumentKind::Other,
        }
    }
}

/// Supplies documents to process.
pub trait DocumentSource {
    /// All pending documents, in processing order.
    fn documents(&self) -> Result<Vec<Document>>;
}

/// Renders a PDF page to an image.
pub trait PageConverter {
    /// PNG bytes of the first page.
    fn first_page_png(&self, pdf: &[u8], settings: &ConversionSettings) -> Result<Vec<u8>>;
}

/// Full-page text annotation of an image.
pub trait OcrService {
    /// Best-effort text; empty when nothing was detected.
    fn annotate(&self, image: &[u8]) -> Result<String>;
}

/// Turns a document into the text the parser consumes.
pub trait TextRecognizer {
    fn recognize(&self, document: &Document) -> Result<String>;
}

/// Appends parsed items to the target sheet.
pub trait SheetWriter {
    fn append(&mut self, outer_po: &str, items: &[LineItem]) -> Result<AppendSummary>;
}

/// Recognizer that rasterizes page 1 and runs OCR on it.
#[derive(Debug, Clone)]
pub struct RasterOcr<C, O> {
    converter: C,
    ocr: O,
    settings: ConversionSettings,
}

impl<C: PageConverter, O: OcrService> RasterOcr<C, O> {
    pub fn new(converter: C, ocr: O, settings: ConversionSettings) -> Self {
        Self {
            converter,
            ocr,
            settings,
        }
    }
}

impl<C: PageConverter, O: OcrService> TextRecognizer for RasterOcr<C, O> {
    fn recognize(&self, document: &Document) -> Result<String> {
        if document.kind() != DocumentKind::Pdf {
            return Err(DocumentError::Unsupported(document.name.clone()).into());
        }

        let image = self.converter.first_page_png(&document.bytes, &self.settings)?;
        if image.is_empty() {
            return Err(RecognitionError::Conversion(format!(
                "{} produced an empty image",
                document.name
            ))
            .into());
        }

        self.ocr.annotate(&image)
    }
}

/// A document after recognition and parsing.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub name: String,
    pub outer_po: String,
    pub extraction: ExtractionResult,
}

/// Outcome of a processed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub name: String,
    pub outer_po: String,
    pub vendor: Vendor,
    pub items: usize,
    pub rows_written: usize,
    pub warnings: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

/// A document that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    pub fn total_rows(&self) -> usize {
        self.documents.iter().map(|d| d.rows_written).sum()
    }

    /// Record a document result, logging failures.
    pub fn push(&mut self, name: &str, result: Result<DocumentReport>) {
        match result {
            Ok(report) => self.documents.push(report),
            Err(e) => self.push_failure(name, e),
        }
    }

    /// Record a document that failed outside the pipeline (e.g. a worker
    /// task that did not complete).
    pub fn push_failure(&mut self, name: &str, error: impl std::fmt::Display) {
        error!("Failed to process {}: {}", name, error);
        self.failures.push(DocumentFailure {
            name: name.to_string(),
            error: error.to_string(),
        });
    }
}

/// Recognize and parse one document. Safe to run on several threads.
pub fn parse_document<R>(
    recognizer: &R,
    parser: &RuleBasedParser,
    document: &Document,
) -> Result<ParsedDocument>
where
    R: TextRecognizer + ?Sized,
{
    let outer_po = outer_po_from_name(&document.name).unwrap_or_else(|| {
        warn!("No outer PO in file name {:?}", document.name);
        String::new()
    });

    let text = recognizer.recognize(document)?;
    if text.trim().is_empty() {
        warn!("No text recognized in {}", document.name);
    }

    let extraction = parser.parse(&text);
    info!(
        "{}: {} items from {}",
        document.name,
        extraction.items.len(),
        extraction.vendor
    );

    Ok(ParsedDocument {
        name: document.name.clone(),
        outer_po,
        extraction,
    })
}

/// Append a parsed document to the sheet. Calls must be serialized to keep
/// row order.
pub fn record<W>(sheet: &mut W, parsed: ParsedDocument) -> Result<DocumentReport>
where
    W: SheetWriter + ?Sized,
{
    let summary = sheet.append(&parsed.outer_po, &parsed.extraction.items)?;
    Ok(DocumentReport {
        name: parsed.name,
        outer_po: parsed.outer_po,
        vendor: parsed.extraction.vendor,
        items: parsed.extraction.items.len(),
        rows_written: summary.rows_written,
        warnings: parsed.extraction.warnings,
        processed_at: Utc::now(),
    })
}

/// Sequential pipeline driver.
pub struct Pipeline<S, R, W> {
    config: PoscanConfig,
    source: S,
    recognizer: R,
    sheet: W,
    parser: RuleBasedParser,
    continue_on_error: bool,
}

impl<S, R, W> Pipeline<S, R, W>
where
    S: DocumentSource,
    R: TextRecognizer,
    W: SheetWriter,
{
    pub fn new(config: PoscanConfig, source: S, recognizer: R, sheet: W) -> Self {
        Self {
            config,
            source,
            recognizer,
            sheet,
            parser: RuleBasedParser::new(),
            continue_on_error: true,
        }
    }

    /// Stop [`run`](Self::run) at the first failing document when `false`.
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn config(&self) -> &PoscanConfig {
        &self.config
    }

    /// Process one document end to end.
    pub fn process(&mut self, document: &Document) -> Result<DocumentReport> {
        let parsed = parse_document(&self.recognizer, &self.parser, document)?;
        record(&mut self.sheet, parsed)
    }

    /// Process every document from the source. A failing document is logged
    /// and recorded and the remaining documents are still processed, unless
    /// continue-on-error was turned off.
    pub fn run(&mut self) -> Result<BatchReport> {
        let documents = self.source.documents()?;
        info!(
            "Processing {} documents into sheet tab {}",
            documents.len(),
            self.config.sheet.tab_index
        );

        let mut report = BatchReport::default();
        for document in &documents {
            match self.process(document) {
                Err(e) if !self.continue_on_error => {
                    error!("Stopping at {}: {}", document.name, e);
                    return Err(e);
                }
                result => report.push(&document.name, result),
            }
        }

        info!(
            "Batch done: {} processed, {} failed, {} rows",
            report.documents.len(),
            report.failures.len(),
            report.total_rows()
        );
        Ok(report)
    }

    /// Give back the sheet writer.
    pub fn into_sheet(self) -> W {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoscanError;
    use pretty_assertions::assert_eq;

    struct MemorySource(Vec<Document>);

    impl DocumentSource for MemorySource {
        fn documents(&self) -> Result<Vec<Document>> {
            Ok(self.0.clone())
        }
    }

    /// Treats the document bytes as already-recognized text.
    struct Passthrough;

    impl TextRecognizer for Passthrough {
        fn recognize(&self, document: &Document) -> Result<String> {
            if document.name.contains("broken") {
                return Err(RecognitionError::Ocr("service unavailable".to_string()).into());
            }
            String::from_utf8(document.bytes.clone()).map_err(|_| RecognitionError::Encoding.into())
        }
    }

    #[derive(Default)]
    struct MemorySheet {
        rows: Vec<(String, LineItem)>,
    }

    impl SheetWriter for MemorySheet {
        fn append(&mut self, outer_po: &str, items: &[LineItem]) -> Result<AppendSummary> {
            for item in items {
                self.rows.push((outer_po.to_string(), item.clone()));
            }
            Ok(AppendSummary {
                rows_written: items.len(),
                ..AppendSummary::default()
            })
        }
    }

    struct FixedPng;

    impl PageConverter for FixedPng {
        fn first_page_png(&self, _pdf: &[u8], settings: &ConversionSettings) -> Result<Vec<u8>> {
            assert_eq!(settings.dpi, 300);
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    struct CannedOcr(&'static str);

    impl OcrService for CannedOcr {
        fn annotate(&self, image: &[u8]) -> Result<String> {
            assert!(!image.is_empty());
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_outer_po_from_name() {
        assert_eq!(outer_po_from_name("SFWW PO# 12345.pdf"), Some("12345".to_string()));
        assert_eq!(outer_po_from_name("sfww po #987 copy.pdf"), Some("987".to_string()));
        assert_eq!(outer_po_from_name("invoice.pdf"), None);
    }

    #[test]
    fn test_document_kind() {
        assert_eq!(Document::new("a.PDF", Vec::<u8>::new()).kind(), DocumentKind::Pdf);
        assert_eq!(Document::new("a.txt", Vec::<u8>::new()).kind(), DocumentKind::Text);
        assert_eq!(Document::new("a.png", Vec::<u8>::new()).kind(), DocumentKind::Other);
    }

    #[test]
    fn test_raster_ocr() {
        let recognizer = RasterOcr::new(
            FixedPng,
            CannedOcr("Baker Boys Distribution"),
            ConversionSettings::default(),
        );
        let text = recognizer.recognize(&Document::new("x.pdf", b"%PDF".to_vec())).unwrap();
        assert_eq!(text, "Baker Boys Distribution");

        let err = recognizer.recognize(&Document::new("x.png", vec![1u8])).unwrap_err();
        assert!(matches!(err, PoscanError::Document(DocumentError::Unsupported(_))));
    }

    #[test]
    fn test_run_continues_after_failure() {
        let source = MemorySource(vec![
            Document::new(
                "SFWW PO# 100.txt",
                "Baker Boys Distribution\nP.O. Number: 5\n1-1 EACH 2 2 0 3.00 6.00 Cap",
            ),
            Document::new("SFWW PO# 101 broken.pdf", Vec::<u8>::new()),
            Document::new("SFWW PO# 102.txt", "AB-1 Mug 1 $4.00 $4.00\nWhite mug"),
        ]);
        let mut pipeline =
            Pipeline::new(PoscanConfig::default(), source, Passthrough, MemorySheet::default());

        let report = pipeline.run().unwrap();
        assert_eq!(report.documents.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "SFWW PO# 101 broken.pdf");
        assert_eq!(report.total_rows(), 2);
        assert_eq!(report.documents[0].vendor, Vendor::BakerBoys);

        let sheet = pipeline.into_sheet();
        let outer: Vec<&str> = sheet.rows.iter().map(|(po, _)| po.as_str()).collect();
        assert_eq!(outer, vec!["100", "102"]);
        assert_eq!(sheet.rows[1].1.description, "White mug");
    }

    #[test]
    fn test_run_stops_when_continue_on_error_is_off() {
        let source = MemorySource(vec![
            Document::new("SFWW PO# 1.txt", "AB-1 Mug 1 $4.00 $4.00\nWhite mug"),
            Document::new("SFWW PO# 2 broken.pdf", Vec::<u8>::new()),
            Document::new("SFWW PO# 3.txt", "AB-2 Mug 1 $4.00 $4.00\nBlack mug"),
        ]);
        let mut pipeline =
            Pipeline::new(PoscanConfig::default(), source, Passthrough, MemorySheet::default())
                .with_continue_on_error(false);

        let err = pipeline.run().unwrap_err();
        assert!(matches!(err, PoscanError::Recognition(RecognitionError::Ocr(_))));
        assert_eq!(pipeline.into_sheet().rows.len(), 1);
    }

    #[test]
    fn test_push_failure() {
        let mut report = BatchReport::default();
        report.push_failure("a.pdf", "task panicked");
        assert_eq!(report.failures[0].name, "a.pdf");
        assert_eq!(report.failures[0].error, "task panicked");
        assert_eq!(report.total_rows(), 0);
    }

    #[test]
    fn test_missing_outer_po_is_empty() {
        let parsed = parse_document(
            &Passthrough,
            &RuleBasedParser::new(),
            &Document::new("scan.txt", ""),
        )
        .unwrap();
        assert_eq!(parsed.outer_po, "");
        assert!(parsed.extraction.items.is_empty());
    }
}
