//! Run command - process an inbox directory into the sheet.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use futures_util::StreamExt;
use futures_util::stream;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use poscan_core::pipeline::{parse_document, record};
use poscan_core::{
    BatchReport, CsvSheet, DirectorySource, DocumentSource, EmbeddedTextRecognizer, Pipeline,
    PoscanConfig, RuleBasedParser,
};

use super::config::load_config;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the PO documents (default: source.input_dir)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// File name glob inside the directory (default: source.pattern)
    #[arg(short, long)]
    pattern: Option<String>,

    /// CSV sheet to append to (default: sheet.output_path)
    #[arg(short, long)]
    sheet: Option<PathBuf>,

    /// Prefix for the invoice column (default: sheet.invoice_prefix)
    #[arg(long)]
    invoice_prefix: Option<String>,

    /// Number of documents parsed concurrently (1 runs the sequential pipeline)
    #[arg(short, long, default_value = "4")]
    jobs: usize,

    /// Write a JSON report of the run
    #[arg(long)]
    report: Option<PathBuf>,

    /// Stop at the first failing document
    #[arg(long)]
    fail_fast: bool,
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(dir) = &args.input_dir {
        config.source.input_dir = dir.clone();
    }
    if let Some(pattern) = &args.pattern {
        config.source.pattern = pattern.clone();
    }
    if let Some(sheet) = &args.sheet {
        config.sheet.output_path = sheet.clone();
    }
    if let Some(prefix) = &args.invoice_prefix {
        config.sheet.invoice_prefix = prefix.clone();
    }

    let sheet_path = config.sheet.output_path.clone();
    let report = if args.jobs <= 1 {
        run_sequential(config, args.fail_fast)?
    } else {
        run_concurrent(config, args.jobs, args.fail_fast).await?
    };
    info!("Sheet written to {}", sheet_path.display());

    if let Some(report_path) = &args.report {
        fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        report.documents.len() + report.failures.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} rows appended to {}",
        style(report.documents.len()).green(),
        style(report.failures.len()).red(),
        report.total_rows(),
        sheet_path.display()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for failure in &report.failures {
            println!("  - {}: {}", failure.name, failure.error);
        }
    }

    Ok(())
}

fn open_sheet(config: &PoscanConfig) -> CsvSheet {
    CsvSheet::new(&config.sheet.output_path)
        .with_invoice_prefix(config.sheet.invoice_prefix.clone())
}

/// One document at a time through the library pipeline.
fn run_sequential(config: PoscanConfig, fail_fast: bool) -> anyhow::Result<BatchReport> {
    let source = DirectorySource::from_config(&config.source);
    let sheet = open_sheet(&config);
    let mut pipeline = Pipeline::new(config, source, EmbeddedTextRecognizer, sheet)
        .with_continue_on_error(!fail_fast);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "Processing {}",
        pipeline.config().source.input_dir.display()
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = pipeline.run();
    spinner.finish_and_clear();

    Ok(report?)
}

/// Recognition and parsing on blocking workers; appends stay in document order.
async fn run_concurrent(
    config: PoscanConfig,
    jobs: usize,
    fail_fast: bool,
) -> anyhow::Result<BatchReport> {
    let documents = DirectorySource::from_config(&config.source).documents()?;
    if documents.is_empty() {
        println!(
            "{} No documents found in {}",
            style("ℹ").blue(),
            config.source.input_dir.display()
        );
        return Ok(BatchReport::default());
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        documents.len()
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents",
            )?
            .progress_chars("=>-"),
    );

    let mut sheet = open_sheet(&config);
    let parser = RuleBasedParser::new();
    let mut report = BatchReport::default();

    // `buffered` yields in input order, so rows land as in a sequential run
    let parsed = stream::iter(documents.into_iter().map(|document| {
        let parser = parser.clone();
        let name = document.name.clone();
        let handle = tokio::task::spawn_blocking(move || {
            parse_document(&EmbeddedTextRecognizer, &parser, &document)
        });
        async move { (name, handle.await) }
    }))
    .buffered(jobs);
    let mut parsed = std::pin::pin!(parsed);

    while let Some((name, joined)) = parsed.next().await {
        let result = match joined {
            Ok(result) => result.and_then(|doc| record(&mut sheet, doc)),
            Err(e) => {
                if fail_fast {
                    pb.abandon();
                    anyhow::bail!("Processing {} failed: {}", name, e);
                }
                report.push_failure(&name, e);
                pb.inc(1);
                continue;
            }
        };

        if fail_fast {
            if let Err(e) = &result {
                pb.abandon();
                anyhow::bail!("Processing {} failed: {}", name, e);
            }
        }

        debug!("Finished {}", name);
        report.push(&name, result);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");
    Ok(report)
}
