//! Whole-workbook translation job.
//!
//! Order of work: prepare the environment, duplicate the input, open source
//! and copy, then process every sheet in declared order with a checkpoint
//! save after each one.
//!
//! When a sheet fails the job stops. If at least one sheet was already
//! checkpointed the output is kept (unless `discard_partial` is set) and the
//! error names the completed sheets. Otherwise the output is deleted.

use crate::duplicate::{default_output_path, duplicate_workbook};
use crate::environment::EnvironmentPreparer;
use crate::error::{TranslatorError, TranslatorResult};
use crate::pass::{process_sheet, SheetReport};
use crate::progress::ProgressReporter;
use crate::snapshot::StructuralSnapshot;
use crate::translate::{
    normalize_language, RetryPolicy, RetryingTranslator, Sleeper, TextTranslator,
};
use crate::workbook::Workbook;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct JobOptions {
    /// Output path; `<stem>_translated.<ext>` next to the input when unset
    pub output: Option<PathBuf>,
    pub source_lang: String,
    pub target_lang: String,
    pub retry: RetryPolicy,
    /// Wait after deleting a previous output, before copying
    pub remove_settle: Duration,
    /// Delete the output on any fatal error, even after checkpoints
    pub discard_partial: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            output: None,
            source_lang: "pt".to_string(),
            target_lang: "en".to_string(),
            retry: RetryPolicy::default(),
            remove_settle: Duration::from_secs(1),
            discard_partial: false,
        }
    }
}

impl JobOptions {
    pub fn output_for(&self, input: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(input))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub output: PathBuf,
    pub sheets: Vec<SheetReport>,
}

impl JobReport {
    pub fn unique_texts(&self) -> usize {
        self.sheets.iter().map(|s| s.unique_texts).sum()
    }

    pub fn passthroughs(&self) -> usize {
        self.sheets.iter().map(|s| s.passthroughs).sum()
    }

    pub fn failed_merges(&self) -> usize {
        self.sheets.iter().map(|s| s.failed_merges.len()).sum()
    }
}

/// Translate `input` into a new workbook and return what was done per sheet
pub fn run_job<W, T, S>(
    input: &Path,
    options: &JobOptions,
    backend: T,
    sleeper: S,
    environment: &dyn EnvironmentPreparer,
    progress: &dyn ProgressReporter,
) -> TranslatorResult<JobReport>
where
    W: Workbook,
    T: TextTranslator,
    S: Sleeper,
{
    let output = options.output_for(input);
    if same_file(input, &output) {
        return Err(TranslatorError::Config(format!(
            "output path {} is the input file",
            output.display()
        )));
    }

    environment.prepare();

    if let Err(e) = duplicate_workbook(input, &output, options.remove_settle) {
        // A copy that died halfway must not look like a result
        if matches!(e, TranslatorError::Copy { .. }) && input.is_file() {
            let _ = fs::remove_file(&output);
        }
        return Err(e);
    }
    info!(input = %input.display(), output = %output.display(), "workbook duplicated");

    let translator = RetryingTranslator::with_sleeper(
        backend,
        options.retry,
        &normalize_language(&options.source_lang),
        &normalize_language(&options.target_lang),
        sleeper,
    );

    let opened = W::open(input).and_then(|source| Ok((source, W::open(&output)?)));
    let (source, mut target) = match opened {
        Ok(books) => books,
        Err(e) => {
            discard_output(&output);
            return Err(e);
        }
    };

    let names = source.sheet_names();
    let mut sheets = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        progress.message(&format!(
            "Processing sheet {}/{}: {}",
            index + 1,
            names.len(),
            name
        ));

        let result = process_sheet(&source, &mut target, name, &translator, progress)
            .and_then(|report| target.save(&output).map(|()| report));

        match result {
            Ok(report) => {
                info!(sheet = %name, output = %output.display(), "checkpoint saved");
                sheets.push(report);
            }
            Err(e) => {
                let completed: Vec<String> = sheets.iter().map(|s| s.name.clone()).collect();
                if completed.is_empty() || options.discard_partial {
                    discard_output(&output);
                } else {
                    warn!(
                        output = %output.display(),
                        completed = completed.len(),
                        "keeping partially translated output"
                    );
                }
                return Err(TranslatorError::SheetFailed {
                    sheet: name.clone(),
                    completed,
                    source: Box::new(e),
                });
            }
        }
    }

    Ok(JobReport { output, sheets })
}

fn discard_output(output: &Path) {
    if output.exists() {
        match fs::remove_file(output) {
            Ok(()) => info!(path = %output.display(), "output removed"),
            Err(e) => warn!(path = %output.display(), "could not remove output: {}", e),
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Read-only view of one sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub snapshot: StructuralSnapshot,
    /// Stored cells, merged members included
    pub cells: usize,
    /// Non-member cells holding translatable text
    pub translatable_cells: usize,
    /// Distinct translatable texts, i.e. remote calls a run would make
    pub unique_texts: usize,
}

/// Describe every sheet without changing anything
pub fn inspect<W: Workbook>(input: &Path) -> TranslatorResult<Vec<SheetSummary>> {
    if !input.is_file() {
        return Err(TranslatorError::InputNotFound(input.to_path_buf()));
    }
    let book = W::open(input)?;
    book.sheet_names()
        .into_iter()
        .map(|name| {
            let snapshot = StructuralSnapshot::capture(&book, &name)?;
            let cells = book.cells(&name)?;
            let texts: Vec<&str> = cells
                .iter()
                .filter(|c| !c.role.is_member())
                .filter_map(|c| c.content.translatable_text())
                .collect();
            let mut unique = texts.clone();
            unique.sort_unstable();
            unique.dedup();
            Ok(SheetSummary {
                snapshot,
                cells: cells.len(),
                translatable_cells: texts.len(),
                unique_texts: unique.len(),
                name,
            })
        })
        .collect()
}
