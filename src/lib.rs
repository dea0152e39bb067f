//! Sheet Translator - translate Excel workbooks, keep their structure
//!
//! The text cells of every sheet are translated into a copy of the input
//! workbook. Formatting, merged ranges, column widths, row heights and macros
//! are carried over.
//!
//! # Pipeline
//!
//! - [`environment`]: best-effort release of file locks held by other programs
//! - [`duplicate`]: byte-for-byte copy of the input
//! - [`snapshot`]: widths, heights and merges captured from the source sheet
//! - [`pass`]: per-sheet collect/apply passes over a fresh [`cache::TranslationCache`]
//! - [`translate`]: translation backend, retry with linear backoff, passthrough
//! - [`job`]: sheet loop, checkpoints and partial-output handling
//!
//! # Example
//!
//! ```no_run
//! use sheet_translator::environment::NoopEnvironment;
//! use sheet_translator::job::{run_job, JobOptions};
//! use sheet_translator::progress::SilentProgress;
//! use sheet_translator::translate::{GoogleTranslator, ThreadSleeper};
//! use sheet_translator::workbook::XlsxWorkbook;
//! use std::path::Path;
//!
//! let report = run_job::<XlsxWorkbook, _, _>(
//!     Path::new("Mapa.xlsm"),
//!     &JobOptions::default(),
//!     GoogleTranslator::public()?,
//!     ThreadSleeper,
//!     &NoopEnvironment,
//!     &SilentProgress,
//! )?;
//! println!("Wrote {}", report.output.display());
//! # Ok::<(), sheet_translator::error::TranslatorError>(())
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicate;
pub mod environment;
pub mod error;
pub mod job;
pub mod pass;
pub mod progress;
pub mod snapshot;
pub mod translate;
pub mod workbook;

// Re-export commonly used types
pub use error::{TranslatorError, TranslatorResult};
pub use job::{run_job, JobOptions, JobReport};
pub use pass::SheetReport;
