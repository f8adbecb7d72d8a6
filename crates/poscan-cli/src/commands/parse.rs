//! Parse command - extract line items from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use poscan_core::pipeline::outer_po_from_name;
use poscan_core::po::rules::format_amount;
use poscan_core::sheet::{build_rows, HEADER};
use poscan_core::{ExtractionResult, PurchaseOrderParser, RuleBasedParser};

use super::config::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (.txt or .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Outer PO to use instead of the one in the file name
    #[arg(long)]
    outer_po: Option<String>,

    /// Do not warn when a total disagrees with qty x unit price
    #[arg(long)]
    no_total_check: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Sheet rows as CSV
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    file: &'a str,
    outer_po: &'a str,
    #[serde(flatten)]
    extraction: &'a ExtractionResult,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Parsing file: {}", args.input.display());
    let (document, text) = super::read_text(&args.input)?;

    let outer_po = args
        .outer_po
        .clone()
        .or_else(|| outer_po_from_name(&document.name))
        .unwrap_or_default();

    let parser = RuleBasedParser::new().with_total_check(!args.no_total_check);
    let extraction = parser.parse(&text);

    for warning in &extraction.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&ParseOutput {
            file: &document.name,
            outer_po: &outer_po,
            extraction: &extraction,
        })?,
        OutputFormat::Csv => format_csv(&outer_po, &config.sheet.invoice_prefix, &extraction)?,
        OutputFormat::Text => format_text(&document.name, &outer_po, &extraction),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Sheet rows for the document, header and total row included.
fn format_csv(
    outer_po: &str,
    invoice_prefix: &str,
    extraction: &ExtractionResult,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER)?;

    if !extraction.items.is_empty() {
        let (rows, total) = build_rows(outer_po, invoice_prefix, &extraction.items);
        for row in &rows {
            wtr.write_record(row.to_record())?;
        }
        wtr.write_record(total.to_record())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(name: &str, outer_po: &str, extraction: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", name));
    output.push_str(&format!("Vendor: {}\n", extraction.vendor));
    if !outer_po.is_empty() {
        output.push_str(&format!("Outer PO: {}\n", outer_po));
    }
    output.push('\n');

    if extraction.items.is_empty() {
        output.push_str("No line items found\n");
        return output;
    }

    output.push_str("Items:\n");
    for (i, item) in extraction.items.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} {} | PO {} | qty {} @ {} = {}\n",
            i + 1,
            item.style,
            item.description,
            item.po,
            item.qty.map(|q| q.to_string()).unwrap_or_else(|| "?".to_string()),
            item.unit_price.map(format_amount).unwrap_or_else(|| "?".to_string()),
            item.total_amount.map(format_amount).unwrap_or_else(|| "?".to_string()),
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Total: {} units, {}\n",
        extraction.total_qty(),
        extraction.total_amount().map(format_amount).unwrap_or_else(|| "?".to_string())
    ));

    output
}
