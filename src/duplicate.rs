//! Workbook duplication: the byte-for-byte copy the translation is written into

use crate::error::{TranslatorError, TranslatorResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// `book.xlsm` → `book_translated.xlsm`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_translated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_translated", stem),
    };
    input.with_file_name(name)
}

/// Copy `input` to `output`, replacing an existing file.
///
/// An existing output is removed first and `settle` is waited before copying.
/// A missing input yields `InputNotFound` and leaves the file system untouched.
pub fn duplicate_workbook(input: &Path, output: &Path, settle: Duration) -> TranslatorResult<u64> {
    if !input.is_file() {
        return Err(TranslatorError::InputNotFound(input.to_path_buf()));
    }
    if output.exists() {
        debug!(path = %output.display(), "removing previous output");
        fs::remove_file(output).map_err(|source| TranslatorError::Copy {
            from: input.to_path_buf(),
            to: output.to_path_buf(),
            source,
        })?;
        if !settle.is_zero() {
            std::thread::sleep(settle);
        }
    }
    fs::copy(input, output).map_err(|source| TranslatorError::Copy {
        from: input.to_path_buf(),
        to: output.to_path_buf(),
        source,
    })
}
