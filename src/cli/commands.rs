use crate::config::{CliOverrides, JobConfig, ResolvedConfig};
use crate::error::{TranslatorError, TranslatorResult};
use crate::job::{inspect as inspect_book, run_job, JobReport, SheetSummary};
use crate::progress::ConsoleProgress;
use crate::translate::{GoogleTranslator, TextTranslator, ThreadSleeper};
use crate::workbook::{address::column_letters, MemoryWorkbook, XlsxWorkbook};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Document backend chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    /// `.xlsx`, `.xlsm`, `.xltx`, `.xltm`
    Xlsx,
    /// JSON dump of a [`MemoryWorkbook`]
    Json,
}

impl WorkbookKind {
    pub fn from_path(path: &Path) -> TranslatorResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xltx" | "xltm" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            _ => Err(TranslatorError::Workbook(format!(
                "Unsupported workbook format: '{}'. Use .xlsx, .xlsm or .json",
                ext
            ))),
        }
    }
}

/// Execute the translate command
pub fn translate(
    input: PathBuf,
    config: Option<PathBuf>,
    overrides: CliOverrides,
    api_key: Option<String>,
    verbose: bool,
) -> TranslatorResult<()> {
    println!("{}", "🔥 Sheet Translator - Translating workbook".bold().green());

    let file = match &config {
        Some(path) => {
            if verbose {
                println!("{}", format!("📖 Reading job file {}", path.display()).cyan());
            }
            Some(JobConfig::from_file(path)?)
        }
        None => None,
    };
    let resolved = ResolvedConfig::resolve(file, &overrides)?;
    let kind = WorkbookKind::from_path(&input)?;
    let output = resolved.job.output_for(&input);

    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!(
        "   Languages: {} → {}",
        resolved.job.source_lang.bright_yellow(),
        resolved.job.target_lang.bright_yellow()
    );

    let backend = GoogleTranslator::from_key(api_key)?;
    if verbose {
        println!("   Provider: {}", backend.provider_name());
        println!(
            "   Retry: {} attempts, {} ms delay",
            resolved.job.retry.max_retries,
            resolved.job.retry.delay.as_millis()
        );
        if resolved.kill_process {
            println!(
                "{}",
                format!("🛑 Closing {} before copying", resolved.process_name).cyan()
            );
        }
    }
    println!();

    let environment = resolved.environment();
    let progress = ConsoleProgress::new(verbose);
    let result = match kind {
        WorkbookKind::Xlsx => run_job::<XlsxWorkbook, _, _>(
            &input,
            &resolved.job,
            backend,
            ThreadSleeper,
            environment.as_ref(),
            &progress,
        ),
        WorkbookKind::Json => run_job::<MemoryWorkbook, _, _>(
            &input,
            &resolved.job,
            backend,
            ThreadSleeper,
            environment.as_ref(),
            &progress,
        ),
    };

    match result {
        Ok(report) => {
            print_job_report(&report);
            Ok(())
        }
        Err(e) => {
            if let TranslatorError::SheetFailed { completed, .. } = &e {
                if !completed.is_empty() && !resolved.job.discard_partial && output.exists() {
                    println!(
                        "{}",
                        format!(
                            "⚠️  Partial output kept at {} (completed: {})",
                            output.display(),
                            completed.join(", ")
                        )
                        .yellow()
                    );
                }
            }
            Err(e)
        }
    }
}

fn print_job_report(report: &JobReport) {
    println!();
    println!("{}", "✅ Translation complete".bold().green());
    println!("   Saved to {}", report.output.display());
    println!();
    println!("{}", "─".repeat(78));
    println!(
        "{:<24} {:>8} {:>10} {:>12} {:>8} {:>10}",
        "Sheet".bold(),
        "Texts".bold(),
        "Cache hits".bold(),
        "Passthrough".bold(),
        "Cells".bold(),
        "Merges".bold()
    );
    println!("{}", "─".repeat(78));
    for sheet in &report.sheets {
        let passthrough = if sheet.passthroughs > 0 {
            sheet.passthroughs.to_string().yellow()
        } else {
            sheet.passthroughs.to_string().normal()
        };
        println!(
            "{:<24} {:>8} {:>10} {:>12} {:>8} {:>10}",
            sheet.name.bright_blue(),
            sheet.unique_texts,
            sheet.cache_hits,
            passthrough,
            sheet.cells_written,
            sheet.merges_restored
        );
    }
    println!("{}", "─".repeat(78));

    if report.passthroughs() > 0 {
        println!(
            "{}",
            format!(
                "⚠️  {} text(s) could not be translated and were kept as-is",
                report.passthroughs()
            )
            .yellow()
        );
    }
    for sheet in &report.sheets {
        for range in &sheet.failed_merges {
            println!(
                "{}",
                format!("⚠️  {}: merged range {} was not restored", sheet.name, range).yellow()
            );
        }
    }
}

/// Execute the inspect command
pub fn inspect(input: PathBuf, json: bool) -> TranslatorResult<()> {
    let summaries = match WorkbookKind::from_path(&input)? {
        WorkbookKind::Xlsx => inspect_book::<XlsxWorkbook>(&input)?,
        WorkbookKind::Json => inspect_book::<MemoryWorkbook>(&input)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "🔍 Sheet Translator - Workbook structure".bold().green());
    println!("   File: {}", input.display());
    println!("   Sheets: {}\n", summaries.len());
    for summary in &summaries {
        print_sheet_summary(summary);
    }
    Ok(())
}

fn print_sheet_summary(summary: &SheetSummary) {
    println!("   📊 Sheet: {}", summary.name.bright_blue().bold());
    println!(
        "      Cells: {}  Translatable: {}  Distinct texts: {}",
        summary.cells, summary.translatable_cells, summary.unique_texts
    );

    let snapshot = &summary.snapshot;
    if !snapshot.column_widths.is_empty() {
        let widths: Vec<String> = snapshot
            .column_widths
            .iter()
            .map(|(col, w)| format!("{}={}", column_letters(*col), w))
            .collect();
        println!("      Column widths: {}", widths.join(", "));
    }
    if !snapshot.row_heights.is_empty() {
        let heights: Vec<String> = snapshot
            .row_heights
            .iter()
            .map(|(row, h)| format!("{}={}", row, h))
            .collect();
        println!("      Row heights: {}", heights.join(", "));
    }
    if !snapshot.merged_ranges.is_empty() {
        let merges: Vec<String> = snapshot
            .merged_ranges
            .iter()
            .map(|r| r.to_string())
            .collect();
        println!("      Merged: {}", merges.join(", ").cyan());
    }
    println!();
}
