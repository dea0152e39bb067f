//! `.xlsx` / `.xlsm` workbooks backed by umya-spreadsheet.
//!
//! umya keeps the parts it does not model (including `vbaProject.bin`) when a
//! workbook is read and written back, which is what lets the translated copy
//! keep its macros.

use super::address::{CellRef, RangeRef};
use super::document::Workbook;
use super::model::{sort_row_major, CellContent, CellRole, SheetCell};
use crate::error::{TranslatorError, TranslatorResult};
use std::collections::BTreeMap;
use std::path::Path;
use umya_spreadsheet::{reader, writer, Cell, CellRawValue, Spreadsheet, Style, Worksheet};

pub struct XlsxWorkbook {
    book: Spreadsheet,
}

impl XlsxWorkbook {
    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self { book }
    }

    fn sheet(&self, name: &str) -> TranslatorResult<&Worksheet> {
        self.book
            .get_sheet_by_name(name)
            .ok_or_else(|| TranslatorError::SheetNotFound(name.to_string()))
    }

    fn sheet_mut(&mut self, name: &str) -> TranslatorResult<&mut Worksheet> {
        self.book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| TranslatorError::SheetNotFound(name.to_string()))
    }

    fn content_of(cell: &Cell) -> CellContent {
        let cv = cell.get_cell_value();
        if cv.is_formula() {
            let cached = cv.get_value();
            return CellContent::Formula {
                formula: cv.get_formula().to_string(),
                cached: if cached.is_empty() {
                    None
                } else {
                    Some(cached.to_string())
                },
            };
        }
        match cv.get_raw_value() {
            CellRawValue::String(s) | CellRawValue::Lazy(s) => CellContent::Text(s.to_string()),
            CellRawValue::RichText(rt) => CellContent::Text(rt.get_text().to_string()),
            CellRawValue::Numeric(n) => CellContent::Number(*n),
            CellRawValue::Bool(b) => CellContent::Bool(*b),
            CellRawValue::Error(_) => CellContent::Error(cv.get_value().to_string()),
            CellRawValue::Empty => CellContent::Empty,
        }
    }

    /// A style counts as explicit when any formatting component is present
    fn has_explicit_style(style: &Style) -> bool {
        style.get_font().is_some()
            || style.get_fill().is_some()
            || style.get_borders().is_some()
            || style.get_alignment().is_some()
            || style.get_numbering_format().is_some()
            || style.get_protection().is_some()
    }
}

impl Workbook for XlsxWorkbook {
    type Style = Style;

    fn open(path: &Path) -> TranslatorResult<Self> {
        let book = reader::xlsx::read(path)?;
        Ok(Self { book })
    }

    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn cells(&self, sheet: &str) -> TranslatorResult<Vec<SheetCell>> {
        let merges = self.merged_ranges(sheet)?;
        let ws = self.sheet(sheet)?;
        let mut cells: Vec<SheetCell> = ws
            .get_cell_collection()
            .into_iter()
            .map(|cell| {
                let coord = cell.get_coordinate();
                let at = CellRef::new(*coord.get_row_num(), *coord.get_col_num());
                SheetCell {
                    at,
                    content: Self::content_of(cell),
                    role: CellRole::classify(at, &merges),
                }
            })
            .collect();
        sort_row_major(&mut cells);
        Ok(cells)
    }

    fn merged_ranges(&self, sheet: &str) -> TranslatorResult<Vec<RangeRef>> {
        self.sheet(sheet)?
            .get_merge_cells()
            .iter()
            .map(|range| range.get_range().parse::<RangeRef>())
            .collect()
    }

    fn column_widths(&self, sheet: &str) -> TranslatorResult<BTreeMap<u32, f64>> {
        let mut widths = BTreeMap::new();
        for column in self.sheet(sheet)?.get_column_dimensions() {
            let width = *column.get_width();
            if width > 0.0 {
                widths.insert(*column.get_col_num(), width);
            }
        }
        Ok(widths)
    }

    fn row_heights(&self, sheet: &str) -> TranslatorResult<BTreeMap<u32, f64>> {
        let mut heights = BTreeMap::new();
        for row in self.sheet(sheet)?.get_row_dimensions() {
            let height = *row.get_height();
            if height > 0.0 {
                heights.insert(*row.get_row_num(), height);
            }
        }
        Ok(heights)
    }

    fn unmerge_all(&mut self, sheet: &str) -> TranslatorResult<usize> {
        let ws = self.sheet_mut(sheet)?;
        let removed = ws.get_merge_cells().len();
        ws.get_merge_cells_mut().clear();
        Ok(removed)
    }

    fn merge(&mut self, sheet: &str, range: &RangeRef) -> TranslatorResult<()> {
        let existing = self.merged_ranges(sheet)?;
        if let Some(clash) = existing.iter().find(|m| m.overlaps(range)) {
            return Err(TranslatorError::MergeConflict {
                range: range.to_string(),
                existing: clash.to_string(),
            });
        }
        self.sheet_mut(sheet)?.add_merge_cells(range.to_string());
        Ok(())
    }

    fn write_value(
        &mut self,
        sheet: &str,
        at: CellRef,
        value: &CellContent,
    ) -> TranslatorResult<()> {
        let ws = self.sheet_mut(sheet)?;
        if value.is_empty() && ws.get_cell((at.col, at.row)).is_none() {
            return Ok(());
        }
        // umya addresses cells as (col, row)
        let cell = ws.get_cell_mut((at.col, at.row));
        match value {
            CellContent::Empty => {
                cell.set_blank();
            }
            CellContent::Text(text) => {
                cell.set_value_string(text.clone());
            }
            CellContent::Number(n) => {
                cell.set_value_number(*n);
            }
            CellContent::Bool(b) => {
                cell.set_value_bool(*b);
            }
            CellContent::Formula { formula, .. } => {
                // The copy already holds this formula and its cached result
                if !(cell.is_formula() && cell.get_formula() == formula.as_str()) {
                    cell.set_formula(formula.clone());
                }
            }
            CellContent::Error(code) => {
                cell.set_value(code.clone());
            }
        }
        Ok(())
    }

    fn cell_style(&self, sheet: &str, at: CellRef) -> TranslatorResult<Option<Style>> {
        let ws = self.sheet(sheet)?;
        Ok(ws
            .get_cell((at.col, at.row))
            .map(|cell| cell.get_style())
            .filter(|style| Self::has_explicit_style(style))
            .cloned())
    }

    fn set_cell_style(&mut self, sheet: &str, at: CellRef, style: Style) -> TranslatorResult<()> {
        self.sheet_mut(sheet)?
            .get_cell_mut((at.col, at.row))
            .set_style(style);
        Ok(())
    }

    fn set_column_width(&mut self, sheet: &str, col: u32, width: f64) -> TranslatorResult<()> {
        self.sheet_mut(sheet)?
            .get_column_dimension_by_number_mut(&col)
            .set_width(width);
        Ok(())
    }

    fn set_row_height(&mut self, sheet: &str, row: u32, height: f64) -> TranslatorResult<()> {
        self.sheet_mut(sheet)?
            .get_row_dimension_mut(&row)
            .set_height(height);
        Ok(())
    }

    fn save(&self, path: &Path) -> TranslatorResult<()> {
        writer::xlsx::write(&self.book, path)?;
        Ok(())
    }
}
