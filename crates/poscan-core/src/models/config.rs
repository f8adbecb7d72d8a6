//! Configuration structures for the PO pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the poscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoscanConfig {
    /// Target spreadsheet configuration.
    pub sheet: SheetConfig,

    /// Document source configuration.
    pub source: SourceConfig,

    /// PDF to image conversion settings.
    pub conversion: ConversionSettings,

    /// OCR service configuration.
    pub ocr: OcrConfig,
}

/// Spreadsheet target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Remote spreadsheet identifier (used by hosted writers).
    pub spreadsheet_id: String,

    /// Zero-based tab index in the spreadsheet.
    pub tab_index: usize,

    /// CSV file the local writer appends to.
    pub output_path: PathBuf,

    /// Prefix for the invoice column derived from the outer PO.
    pub invoice_prefix: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            tab_index: 1,
            output_path: PathBuf::from("po-lines.csv"),
            invoice_prefix: String::new(),
        }
    }
}

/// Where documents come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Remote folder identifier (used by hosted sources).
    pub folder_id: String,

    /// Local inbox directory.
    pub input_dir: PathBuf,

    /// File name glob inside the inbox.
    pub pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            folder_id: String::new(),
            input_dir: PathBuf::from("inbox"),
            pattern: "*".to_string(),
        }
    }
}

/// PDF page rasterization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Render resolution.
    pub dpi: u32,

    /// Output quality (0 - 100).
    pub quality: u8,

    /// Flatten transparency onto a white background.
    pub flatten: bool,

    /// Convert only the first page.
    pub first_page_only: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            quality: 100,
            flatten: true,
            first_page_only: true,
        }
    }
}

/// OCR service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Cloud project hosting the OCR API.
    pub project_id: String,

    /// Annotation feature requested from the service.
    pub feature: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            feature: "DOCUMENT_TEXT_DETECTION".to_string(),
        }
    }
}

impl PoscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
