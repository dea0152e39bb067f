//! The document-model seam the translation pipeline is written against.
//!
//! The pipeline only needs a handful of operations from a spreadsheet
//! library: enumerate classified cells, read and copy styles, merge and
//! unmerge, read and set dimensions, and save. [`XlsxWorkbook`] provides them
//! for real files; [`MemoryWorkbook`] provides them for tests.
//!
//! [`XlsxWorkbook`]: super::XlsxWorkbook
//! [`MemoryWorkbook`]: super::MemoryWorkbook

use super::address::{CellRef, RangeRef};
use super::model::{CellContent, SheetCell};
use crate::error::TranslatorResult;
use std::collections::BTreeMap;
use std::path::Path;

pub trait Workbook: Sized {
    /// Opaque per-cell formatting (font, fill, border, alignment, number format)
    type Style: Clone;

    /// Open a workbook from disk, keeping macro parts for the next save
    fn open(path: &Path) -> TranslatorResult<Self>;

    /// Sheet names in declared order
    fn sheet_names(&self) -> Vec<String>;

    /// Every stored cell of a sheet in row-major order, classified against
    /// the sheet's merged ranges
    fn cells(&self, sheet: &str) -> TranslatorResult<Vec<SheetCell>>;

    /// Merged ranges in the order the sheet declares them
    fn merged_ranges(&self, sheet: &str) -> TranslatorResult<Vec<RangeRef>>;

    /// Columns with an explicit width (1-based column → width)
    fn column_widths(&self, sheet: &str) -> TranslatorResult<BTreeMap<u32, f64>>;

    /// Rows with an explicit height (1-based row → height)
    fn row_heights(&self, sheet: &str) -> TranslatorResult<BTreeMap<u32, f64>>;

    /// Remove every merged range from a sheet, returning how many were removed
    fn unmerge_all(&mut self, sheet: &str) -> TranslatorResult<usize>;

    /// Merge a range. Fails with `MergeConflict` when it overlaps an existing merge.
    fn merge(&mut self, sheet: &str, range: &RangeRef) -> TranslatorResult<()>;

    fn write_value(&mut self, sheet: &str, at: CellRef, value: &CellContent)
        -> TranslatorResult<()>;

    /// Explicit style of a cell; `None` when the cell carries no formatting
    fn cell_style(&self, sheet: &str, at: CellRef) -> TranslatorResult<Option<Self::Style>>;

    fn set_cell_style(&mut self, sheet: &str, at: CellRef, style: Self::Style)
        -> TranslatorResult<()>;

    fn set_column_width(&mut self, sheet: &str, col: u32, width: f64) -> TranslatorResult<()>;

    fn set_row_height(&mut self, sheet: &str, row: u32, height: f64) -> TranslatorResult<()>;

    fn save(&self, path: &Path) -> TranslatorResult<()>;
}
