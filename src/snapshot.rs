//! Structural snapshot: layout captured from the untouched source sheet and
//! re-applied to the translated copy.

use crate::error::TranslatorResult;
use crate::progress::ProgressReporter;
use crate::workbook::{RangeRef, Workbook};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuralSnapshot {
    /// Column number → width, explicit widths only
    pub column_widths: BTreeMap<u32, f64>,
    /// Row number → height, explicit heights only
    pub row_heights: BTreeMap<u32, f64>,
    /// Merge ranges in source declaration order
    pub merged_ranges: Vec<RangeRef>,
}

/// Merges that could not be re-applied are reported, not dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeRestore {
    pub restored: usize,
    pub failed: Vec<(RangeRef, String)>,
}

impl StructuralSnapshot {
    /// Capture layout from the source sheet. Must run before the target copy
    /// of the same sheet is unmerged.
    pub fn capture<W: Workbook>(book: &W, sheet: &str) -> TranslatorResult<Self> {
        Ok(Self {
            column_widths: book.column_widths(sheet)?,
            row_heights: book.row_heights(sheet)?,
            merged_ranges: book.merged_ranges(sheet)?,
        })
    }

    /// Re-merge every captured range in order. A range that cannot be merged
    /// is logged and skipped.
    pub fn restore_merges<W: Workbook>(
        &self,
        target: &mut W,
        sheet: &str,
        progress: &dyn ProgressReporter,
    ) -> MergeRestore {
        let mut outcome = MergeRestore::default();
        progress.start("Restoring merged cells", self.merged_ranges.len());
        for range in &self.merged_ranges {
            match target.merge(sheet, range) {
                Ok(()) => outcome.restored += 1,
                Err(e) => {
                    warn!(sheet, range = %range, "Could not merge cells: {}", e);
                    progress.message(&format!("Warning: Could not merge cells {}: {}", range, e));
                    outcome.failed.push((*range, e.to_string()));
                }
            }
            progress.advance(1);
        }
        progress.finish();
        outcome
    }

    /// Re-apply captured column widths and row heights
    pub fn restore_layout<W: Workbook>(&self, target: &mut W, sheet: &str) -> TranslatorResult<()> {
        for (col, width) in &self.column_widths {
            target.set_column_width(sheet, *col, *width)?;
        }
        for (row, height) in &self.row_heights {
            target.set_row_height(sheet, *row, *height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use crate::workbook::MemoryWorkbook;

    fn source() -> MemoryWorkbook {
        let mut book = MemoryWorkbook::new();
        let sheet = book.add_sheet("Plan1");
        sheet.add_merge("B2:C3").add_merge("A1:A2");
        sheet.column_widths.insert(1, 25.5);
        sheet.row_heights.insert(3, 40.0);
        book
    }

    #[test]
    fn test_capture_keeps_declaration_order() {
        let snap = StructuralSnapshot::capture(&source(), "Plan1").unwrap();
        let merges: Vec<String> = snap.merged_ranges.iter().map(|r| r.to_string()).collect();
        assert_eq!(merges, vec!["B2:C3", "A1:A2"]);
        assert_eq!(snap.column_widths.get(&1), Some(&25.5));
        assert_eq!(snap.row_heights.get(&3), Some(&40.0));
    }

    #[test]
    fn test_restore_round_trip() {
        let src = source();
        let snap = StructuralSnapshot::capture(&src, "Plan1").unwrap();

        let mut target = src.clone();
        target.unmerge_all("Plan1").unwrap();
        target.sheet_mut("Plan1").unwrap().column_widths.clear();

        let outcome = snap.restore_merges(&mut target, "Plan1", &SilentProgress);
        snap.restore_layout(&mut target, "Plan1").unwrap();

        assert_eq!(outcome.restored, 2);
        assert!(outcome.failed.is_empty());
        assert_eq!(StructuralSnapshot::capture(&target, "Plan1").unwrap(), snap);
    }

    #[test]
    fn test_failed_merge_is_reported_and_skipped() {
        let src = source();
        let snap = StructuralSnapshot::capture(&src, "Plan1").unwrap();

        let mut target = src.clone();
        target.unmerge_all("Plan1").unwrap();
        target.merge("Plan1", &"C3:D4".parse().unwrap()).unwrap();

        let outcome = snap.restore_merges(&mut target, "Plan1", &SilentProgress);
        assert_eq!(outcome.restored, 1);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0.to_string(), "B2:C3");
    }

    #[test]
    fn test_unset_dimensions_leave_target_defaults() {
        let mut src = MemoryWorkbook::new();
        src.add_sheet("S");
        let snap = StructuralSnapshot::capture(&src, "S").unwrap();

        let mut target = MemoryWorkbook::new();
        target.add_sheet("S").column_widths.insert(2, 9.0);
        snap.restore_layout(&mut target, "S").unwrap();
        assert_eq!(target.sheet("S").unwrap().column_widths.get(&2), Some(&9.0));
    }
}
