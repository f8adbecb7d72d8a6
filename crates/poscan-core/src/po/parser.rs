//! Purchase-order parser: routes text to a vendor grammar and collects items.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::detector::detect;
use crate::models::po::{LineItem, Vendor};

/// Parse OCR text into line items.
///
/// Blank text and text in which no rule matches both give an empty vector.
/// Items come back in document order (or match order for block layouts).
pub fn parse(text: &str) -> Vec<LineItem> {
    detect(text).extract(text)
}

/// Result of parsing one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Vendor the text was routed to.
    pub vendor: Vendor,
    /// Extracted line items.
    pub items: Vec<LineItem>,
    /// Data-quality warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Sum of quantities, skipping unreadable ones. Saturates at `u64::MAX`.
    pub fn total_qty(&self) -> u64 {
        self.items
            .iter()
            .filter_map(|i| i.qty)
            .fold(0u64, |acc, q| acc.saturating_add(q))
    }

    /// Sum of line totals, skipping unreadable ones. `None` on overflow.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.items
            .iter()
            .filter_map(|i| i.total_amount)
            .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t))
    }
}

/// Trait for purchase-order parsing.
pub trait PurchaseOrderParser {
    /// Parse a document's text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Rule-based parser over the vendor grammars.
#[derive(Debug, Clone)]
pub struct RuleBasedParser {
    /// Whether to warn about totals that disagree with qty x unit price.
    check_totals: bool,
}

impl RuleBasedParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self { check_totals: true }
    }

    /// Enable or disable the total consistency check.
    pub fn with_total_check(mut self, check: bool) -> Self {
        self.check_totals = check;
        self
    }

    fn collect_warnings(&self, items: &[LineItem]) -> Vec<String> {
        let mut warnings = Vec::new();

        if items.is_empty() {
            warnings.push("No line items found".to_string());
        }

        for (n, item) in items.iter().enumerate() {
            if !item.has_numbers() {
                warnings.push(format!("Item {} ({}): unreadable number", n + 1, item.style));
            } else if self.check_totals && item.is_consistent() == Some(false) {
                warnings.push(format!(
                    "Item {} ({}): total does not match qty x unit price",
                    n + 1,
                    item.style
                ));
            }
        }

        warnings
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseOrderParser for RuleBasedParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing purchase order from {} characters of text", text.len());

        let grammar = detect(text);
        let items = grammar.extract(text);
        let warnings = self.collect_warnings(&items);

        for warning in &warnings {
            warn!("{}", warning);
        }

        debug!(
            "Extracted {} items for {} with {} warnings",
            items.len(),
            grammar.vendor(),
            warnings.len()
        );

        ExtractionResult {
            vendor: grammar.vendor(),
            items,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
