//! Spreadsheet rows and the CSV-backed sheet writer.
//!
//! Every line item becomes one row in a fixed column order, and each append
//! ends with a grand-total row. The header is written only into an empty
//! sheet.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SheetError};
use crate::models::po::LineItem;
use crate::pipeline::SheetWriter;

/// Column headers, in row order.
pub const HEADER: [&str; 9] = [
    "Outer PO",
    "Invoice",
    "Customer",
    "PO",
    "Style",
    "Description",
    "Qty",
    "Unit Price",
    "Total Amount",
];

const TOTAL_LABEL: &str = "TOTAL";

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub outer_po: String,
    pub invoice: String,
    pub customer: String,
    pub po: String,
    pub style: String,
    pub description: String,
    pub qty: Option<u64>,
    pub unit_price: Option<Decimal>,
    pub total_amount: Option<Decimal>,
}

impl SheetRow {
    /// Row for a line item of the document identified by `outer_po`.
    pub fn from_item(outer_po: &str, invoice: &str, item: &LineItem) -> Self {
        Self {
            outer_po: outer_po.to_string(),
            invoice: invoice.to_string(),
            customer: item.customer.clone(),
            po: item.po.clone(),
            style: item.style.clone(),
            description: item.description.clone(),
            qty: item.qty,
            unit_price: item.unit_price,
            total_amount: item.total_amount,
        }
    }

    /// Cell values in column order.
    pub fn to_record(&self) -> [String; 9] {
        [
            self.outer_po.clone(),
            self.invoice.clone(),
            self.customer.clone(),
            self.po.clone(),
            self.style.clone(),
            self.description.clone(),
            self.qty.map(|q| q.to_string()).unwrap_or_default(),
            money_cell(self.unit_price),
            money_cell(self.total_amount),
        ]
    }
}

/// Grand total appended after a document's rows. A sum that overflows is
/// left empty, like an unreadable cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TotalRow {
    pub qty: Option<u64>,
    pub total_amount: Option<Decimal>,
}

impl TotalRow {
    /// Sum quantities and totals, skipping unreadable cells.
    pub fn from_rows(rows: &[SheetRow]) -> Self {
        Self {
            qty: rows
                .iter()
                .filter_map(|r| r.qty)
                .try_fold(0u64, |acc, q| acc.checked_add(q)),
            total_amount: rows
                .iter()
                .filter_map(|r| r.total_amount)
                .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t)),
        }
    }

    pub fn to_record(&self) -> [String; 9] {
        [
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            TOTAL_LABEL.to_string(),
            self.qty.map(|q| q.to_string()).unwrap_or_default(),
            String::new(),
            money_cell(self.total_amount),
        ]
    }
}

fn money_cell(amount: Option<Decimal>) -> String {
    amount
        .map(|a| format!("{:.2}", a.round_dp(2)))
        .unwrap_or_default()
}

/// Invoice column value for an outer PO.
pub fn invoice_number(prefix: &str, outer_po: &str) -> String {
    if outer_po.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, outer_po)
    }
}

/// Rows plus grand total for one document.
pub fn build_rows(
    outer_po: &str,
    invoice_prefix: &str,
    items: &[LineItem],
) -> (Vec<SheetRow>, TotalRow) {
    let invoice = invoice_number(invoice_prefix, outer_po);
    let rows: Vec<SheetRow> = items
        .iter()
        .map(|item| SheetRow::from_item(outer_po, &invoice, item))
        .collect();
    let total = TotalRow::from_rows(&rows);
    (rows, total)
}

/// What an append wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppendSummary {
    /// Item rows written (excluding header and total).
    pub rows_written: usize,
    /// Whether the header was inserted.
    pub header_written: bool,
    /// Grand total, if a total row was written.
    pub total: Option<TotalRow>,
}

/// Sheet stored as a CSV file; rows are appended below existing data.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
    invoice_prefix: String,
}

impl CsvSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            invoice_prefix: String::new(),
        }
    }

    /// Set the prefix used for the invoice column.
    pub fn with_invoice_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.invoice_prefix = prefix.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_empty(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true)
    }
}

impl SheetWriter for CsvSheet {
    fn append(&mut self, outer_po: &str, items: &[LineItem]) -> Result<AppendSummary> {
        if items.is_empty() {
            debug!("No rows to append for outer PO {:?}", outer_po);
            return Ok(AppendSummary::default());
        }

        let header_written = self.is_empty();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SheetError::Open {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        let mut wtr = csv::Writer::from_writer(file);

        if header_written {
            wtr.write_record(HEADER)?;
        }

        let (rows, total) = build_rows(outer_po, &self.invoice_prefix, items);
        for row in &rows {
            wtr.write_record(row.to_record())?;
        }
        wtr.write_record(total.to_record())?;
        wtr.flush()?;

        info!(
            "Appended {} rows for outer PO {:?} to {}",
            rows.len(),
            outer_po,
            self.path.display()
        );

        Ok(AppendSummary {
            rows_written: rows.len(),
            header_written,
            total: Some(total),
        })
    }
}
