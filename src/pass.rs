//! Per-sheet pass controller.
//!
//! One sheet goes through these steps, strictly in order:
//!
//! 1. capture the structural snapshot from the source sheet
//! 2. unmerge every range on the target sheet
//! 3. collect: walk source cells row-major and translate each distinct text once
//! 4. apply: walk source cells again, write cached text or the original value,
//!    copy explicit styles
//! 5. restore merges (failures are reported and skipped)
//! 6. restore column widths and row heights
//!
//! Merged-range members are skipped in both walks. Checkpointing the target
//! to disk is the job's responsibility.

use crate::cache::TranslationCache;
use crate::error::TranslatorResult;
use crate::progress::ProgressReporter;
use crate::snapshot::StructuralSnapshot;
use crate::translate::{RetryingTranslator, Sleeper, TextTranslator};
use crate::workbook::{CellContent, SheetCell, Workbook};
use serde::Serialize;
use tracing::debug;

/// What happened to one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetReport {
    pub name: String,
    /// Distinct texts sent to the translator
    pub unique_texts: usize,
    /// Occurrences answered from the cache
    pub cache_hits: usize,
    /// Texts kept unchanged after every attempt failed
    pub passthroughs: usize,
    /// Anchor and ordinary cells written to the target
    pub cells_written: usize,
    pub merges_restored: usize,
    /// Ranges that could not be merged again
    pub failed_merges: Vec<String>,
}

/// Result of the collect step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub passthroughs: usize,
}

/// Run every step for `sheet` except the checkpoint
pub fn process_sheet<W, T, S>(
    source: &W,
    target: &mut W,
    sheet: &str,
    translator: &RetryingTranslator<T, S>,
    progress: &dyn ProgressReporter,
) -> TranslatorResult<SheetReport>
where
    W: Workbook,
    T: TextTranslator,
    S: Sleeper,
{
    let snapshot = StructuralSnapshot::capture(source, sheet)?;

    let unmerged = target.unmerge_all(sheet)?;
    debug!(sheet, unmerged, "target sheet unmerged");

    let cells = source.cells(sheet)?;
    let mut cache = TranslationCache::new();

    let stats = collect_translations(&cells, &mut cache, translator, progress);
    let cells_written = apply_translations(source, target, sheet, &cells, &cache, progress)?;

    let merges = snapshot.restore_merges(target, sheet, progress);
    snapshot.restore_layout(target, sheet)?;

    Ok(SheetReport {
        name: sheet.to_string(),
        unique_texts: cache.len(),
        cache_hits: cache.hits(),
        passthroughs: stats.passthroughs,
        cells_written,
        merges_restored: merges.restored,
        failed_merges: merges.failed.iter().map(|(r, _)| r.to_string()).collect(),
    })
}

/// Fill `cache` with a translation for every distinct translatable text.
///
/// Only read access to the source is needed; `cells` is the source walk.
pub fn collect_translations<T, S>(
    cells: &[SheetCell],
    cache: &mut TranslationCache,
    translator: &RetryingTranslator<T, S>,
    progress: &dyn ProgressReporter,
) -> CollectStats
where
    T: TextTranslator,
    S: Sleeper,
{
    let texts: Vec<&str> = cells
        .iter()
        .filter(|c| !c.role.is_member())
        .filter_map(|c| c.content.translatable_text())
        .collect();

    let mut stats = CollectStats::default();
    progress.start("Translating", texts.len());
    for text in texts {
        let mut fresh = None;
        cache.get_or_translate(text, |t| {
            let outcome = translator.translate_detailed(t);
            fresh = Some(outcome.translated);
            outcome.text
        });
        match fresh {
            Some(true) => {
                if let Some(out) = cache.get(text) {
                    progress.message(&format!("{} -> {}", text, out));
                }
            }
            Some(false) => stats.passthroughs += 1,
            None => {}
        }
        progress.advance(1);
    }
    progress.finish();
    stats
}

/// Write every non-member cell into the target and copy its explicit style.
/// Returns the number of cells written.
pub fn apply_translations<W: Workbook>(
    source: &W,
    target: &mut W,
    sheet: &str,
    cells: &[SheetCell],
    cache: &TranslationCache,
    progress: &dyn ProgressReporter,
) -> TranslatorResult<usize> {
    let writable: Vec<&SheetCell> = cells.iter().filter(|c| !c.role.is_member()).collect();

    progress.start("Applying", writable.len());
    for cell in &writable {
        let value = match cell.content.translatable_text() {
            Some(text) => CellContent::Text(cache.get(text).unwrap_or(text).to_string()),
            None => cell.content.clone(),
        };
        target.write_value(sheet, cell.at, &value)?;
        if let Some(style) = source.cell_style(sheet, cell.at)? {
            target.set_cell_style(sheet, cell.at, style)?;
        }
        progress.advance(1);
    }
    progress.finish();
    Ok(writable.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{RecordingProgress, SilentProgress};
    use crate::translate::{MockTranslator, NoSleep, RetryPolicy};
    use crate::workbook::{CellRef, MemoryWorkbook, RangeRef};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn adapter(mock: &MockTranslator) -> RetryingTranslator<&MockTranslator, NoSleep> {
        RetryingTranslator::with_sleeper(
            mock,
            RetryPolicy::new(3, Duration::from_millis(10)),
            "pt",
            "en",
            NoSleep,
        )
    }

    fn sample() -> MemoryWorkbook {
        let mut book = MemoryWorkbook::new();
        book.add_sheet("Sheet1")
            .set_text("A1", "Olá")
            .set("B1", CellContent::Number(42.0))
            .set_text("C1", "Olá")
            .set_text("A2", "fantasma")
            .set_text("D1", "   ")
            .set_style("A1", "font", "bold")
            .add_merge("A1:A2");
        book
    }

    #[test]
    fn test_sheet_scenario() {
        let source = sample();
        let mut target = source.clone();
        let mock = MockTranslator::dictionary([("Olá", "Hello")]);

        let report =
            process_sheet(&source, &mut target, "Sheet1", &adapter(&mock), &SilentProgress)
                .unwrap();

        assert_eq!(mock.calls_for("Olá"), 1);
        assert_eq!(mock.calls_for("fantasma"), 0);
        assert_eq!(mock.calls_for("   "), 0);

        let out = target.sheet("Sheet1").unwrap();
        assert_eq!(out.content("A1"), CellContent::Text("Hello".into()));
        assert_eq!(out.content("C1"), CellContent::Text("Hello".into()));
        assert_eq!(out.content("B1"), CellContent::Number(42.0));
        assert_eq!(out.content("D1"), CellContent::Text("   ".into()));
        assert_eq!(out.merges, vec!["A1:A2".parse::<RangeRef>().unwrap()]);
        assert_eq!(
            out.get("A1").and_then(|c| c.style.clone()).unwrap()["font"],
            "bold"
        );

        assert_eq!(report.unique_texts, 1);
        assert_eq!(report.cache_hits, 1);
        assert_eq!(report.cells_written, 4);
        assert_eq!(report.merges_restored, 1);
    }

    #[test]
    fn test_merged_members_are_never_written() {
        let source = sample();
        let mut target = source.clone();
        let mock = MockTranslator::suffix();

        process_sheet(&source, &mut target, "Sheet1", &adapter(&mock), &SilentProgress).unwrap();

        let a2: CellRef = "A2".parse().unwrap();
        assert!(!target.write_log.iter().any(|(_, at)| *at == a2));
        assert_eq!(
            target.sheet("Sheet1").unwrap().content("A2"),
            CellContent::Text("fantasma".into())
        );
    }

    #[test]
    fn test_failed_text_passes_through() {
        let mut source = MemoryWorkbook::new();
        source.add_sheet("S").set_text("A1", "Erro").set_text("A2", "Bom");
        let mut target = source.clone();
        let mock = MockTranslator::suffix().failing_on("Erro");

        let report =
            process_sheet(&source, &mut target, "S", &adapter(&mock), &SilentProgress).unwrap();

        assert_eq!(mock.calls_for("Erro"), 3);
        assert_eq!(report.passthroughs, 1);
        let out = target.sheet("S").unwrap();
        assert_eq!(out.content("A1"), CellContent::Text("Erro".into()));
        assert_eq!(out.content("A2"), CellContent::Text("Bom_en".into()));
    }

    #[test]
    fn test_unstyled_cell_gets_no_style() {
        let mut source = MemoryWorkbook::new();
        source.add_sheet("S").set_text("A1", "texto");
        let mut target = source.clone();
        let mock = MockTranslator::suffix();

        process_sheet(&source, &mut target, "S", &adapter(&mock), &SilentProgress).unwrap();
        assert_eq!(target.sheet("S").unwrap().get("A1").unwrap().style, None);
    }

    #[test]
    fn test_conflicting_merge_is_reported() {
        let mut source = MemoryWorkbook::new();
        source.add_sheet("S").add_merge("A1:B2").add_merge("B2:C3");
        let mut target = source.clone();
        let mock = MockTranslator::suffix();

        let report =
            process_sheet(&source, &mut target, "S", &adapter(&mock), &SilentProgress).unwrap();
        assert_eq!(report.merges_restored, 1);
        assert_eq!(report.failed_merges, vec!["B2:C3".to_string()]);
    }

    #[test]
    fn test_progress_counts_reach_totals() {
        let source = sample();
        let mut target = source.clone();
        let mock = MockTranslator::dictionary([("Olá", "Hello")]);
        let progress = RecordingProgress::new();

        process_sheet(&source, &mut target, "Sheet1", &adapter(&mock), &progress).unwrap();

        assert_eq!(
            progress.phases(),
            vec![
                ("Translating".to_string(), 2, 2),
                ("Applying".to_string(), 4, 4),
                ("Restoring merged cells".to_string(), 1, 1),
            ]
        );
        assert_eq!(progress.messages(), vec!["Olá -> Hello".to_string()]);
    }
}
