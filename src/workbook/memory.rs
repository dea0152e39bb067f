//! In-memory workbook stored as JSON on disk.
//!
//! Behaves like a spreadsheet document for every operation the pipeline
//! uses, and keeps a log of written cells so merged-member handling can be
//! checked after a run.

use super::address::{CellRef, RangeRef};
use super::document::Workbook;
use super::model::{sort_row_major, CellContent, CellRole, SheetCell};
use crate::error::{TranslatorError, TranslatorResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Style attributes by name (`font`, `fill`, `border`, `number_format`, ...)
pub type MemoryStyle = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCell {
    pub content: CellContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<MemoryStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemorySheet {
    pub name: String,
    #[serde(default)]
    pub cells: BTreeMap<CellRef, MemoryCell>,
    #[serde(default)]
    pub merges: Vec<RangeRef>,
    #[serde(default)]
    pub column_widths: BTreeMap<u32, f64>,
    #[serde(default)]
    pub row_heights: BTreeMap<u32, f64>,
    /// Protected sheets reject every write
    #[serde(default)]
    pub protected: bool,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set a cell by A1 address (test and fixture helper)
    pub fn set(&mut self, addr: &str, content: CellContent) -> &mut Self {
        if let Ok(at) = addr.parse::<CellRef>() {
            self.cells.entry(at).or_default().content = content;
        }
        self
    }

    pub fn set_text(&mut self, addr: &str, text: &str) -> &mut Self {
        self.set(addr, CellContent::Text(text.to_string()))
    }

    pub fn set_style(&mut self, addr: &str, key: &str, value: &str) -> &mut Self {
        if let Ok(at) = addr.parse::<CellRef>() {
            self.cells
                .entry(at)
                .or_default()
                .style
                .get_or_insert_with(MemoryStyle::new)
                .insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn add_merge(&mut self, range: &str) -> &mut Self {
        if let Ok(range) = range.parse::<RangeRef>() {
            self.merges.push(range);
        }
        self
    }

    pub fn get(&self, addr: &str) -> Option<&MemoryCell> {
        addr.parse::<CellRef>()
            .ok()
            .and_then(|at| self.cells.get(&at))
    }

    pub fn content(&self, addr: &str) -> CellContent {
        self.get(addr).map(|c| c.content.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryWorkbook {
    pub sheets: Vec<MemorySheet>,
    /// Cells written since the workbook was opened, in write order
    #[serde(skip)]
    pub write_log: Vec<(String, CellRef)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, name: &str) -> &mut MemorySheet {
        self.sheets.push(MemorySheet::new(name));
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    pub fn sheet(&self, name: &str) -> TranslatorResult<&MemorySheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| TranslatorError::SheetNotFound(name.to_string()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> TranslatorResult<&mut MemorySheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| TranslatorError::SheetNotFound(name.to_string()))
    }

    fn writable_sheet(&mut self, name: &str) -> TranslatorResult<&mut MemorySheet> {
        let sheet = self.sheet_mut(name)?;
        if sheet.protected {
            return Err(TranslatorError::Workbook(format!(
                "sheet '{}' is protected",
                name
            )));
        }
        Ok(sheet)
    }
}

impl Workbook for MemoryWorkbook {
    type Style = MemoryStyle;

    fn open(path: &Path) -> TranslatorResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn cells(&self, sheet: &str) -> TranslatorResult<Vec<SheetCell>> {
        let sheet = self.sheet(sheet)?;
        let mut cells: Vec<SheetCell> = sheet
            .cells
            .iter()
            .map(|(at, cell)| SheetCell {
                at: *at,
                content: cell.content.clone(),
                role: CellRole::classify(*at, &sheet.merges),
            })
            .collect();
        sort_row_major(&mut cells);
        Ok(cells)
    }

    fn merged_ranges(&self, sheet: &str) -> TranslatorResult<Vec<RangeRef>> {
        Ok(self.sheet(sheet)?.merges.clone())
    }

    fn column_widths(&self, sheet: &str) -> TranslatorResult<BTreeMap<u32, f64>> {
        Ok(self.sheet(sheet)?.column_widths.clone())
    }

    fn row_heights(&self, sheet: &str) -> TranslatorResult<BTreeMap<u32, f64>> {
        Ok(self.sheet(sheet)?.row_heights.clone())
    }

    fn unmerge_all(&mut self, sheet: &str) -> TranslatorResult<usize> {
        let sheet = self.sheet_mut(sheet)?;
        let removed = sheet.merges.len();
        sheet.merges.clear();
        Ok(removed)
    }

    fn merge(&mut self, sheet: &str, range: &RangeRef) -> TranslatorResult<()> {
        let sheet = self.sheet_mut(sheet)?;
        if let Some(existing) = sheet.merges.iter().find(|m| m.overlaps(range)) {
            return Err(TranslatorError::MergeConflict {
                range: range.to_string(),
                existing: existing.to_string(),
            });
        }
        sheet.merges.push(*range);
        Ok(())
    }

    fn write_value(
        &mut self,
        sheet: &str,
        at: CellRef,
        value: &CellContent,
    ) -> TranslatorResult<()> {
        let target = self.writable_sheet(sheet)?;
        match target.cells.get_mut(&at) {
            Some(cell) => cell.content = value.clone(),
            // Writing nothing into a missing cell must not materialise it
            None if value.is_empty() => return Ok(()),
            None => {
                target.cells.insert(
                    at,
                    MemoryCell {
                        content: value.clone(),
                        style: None,
                    },
                );
            }
        }
        self.write_log.push((sheet.to_string(), at));
        Ok(())
    }

    fn cell_style(&self, sheet: &str, at: CellRef) -> TranslatorResult<Option<MemoryStyle>> {
        Ok(self
            .sheet(sheet)?
            .cells
            .get(&at)
            .and_then(|c| c.style.clone())
            .filter(|s| !s.is_empty()))
    }

    fn set_cell_style(
        &mut self,
        sheet: &str,
        at: CellRef,
        style: MemoryStyle,
    ) -> TranslatorResult<()> {
        let target = self.writable_sheet(sheet)?;
        target.cells.entry(at).or_default().style = Some(style);
        Ok(())
    }

    fn set_column_width(&mut self, sheet: &str, col: u32, width: f64) -> TranslatorResult<()> {
        self.sheet_mut(sheet)?.column_widths.insert(col, width);
        Ok(())
    }

    fn set_row_height(&mut self, sheet: &str, row: u32, height: f64) -> TranslatorResult<()> {
        self.sheet_mut(sheet)?.row_heights.insert(row, height);
        Ok(())
    }

    fn save(&self, path: &Path) -> TranslatorResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> MemoryWorkbook {
        let mut book = MemoryWorkbook::new();
        book.add_sheet("Dados")
            .set_text("A1", "Olá")
            .set("B1", CellContent::Number(42.0))
            .set_style("A1", "font", "bold")
            .add_merge("A1:A2");
        book
    }

    #[test]
    fn test_cells_are_classified() {
        let mut book = sample();
        book.sheet_mut("Dados").unwrap().set_text("A2", "hidden");
        let cells = book.cells("Dados").unwrap();
        let roles: Vec<(String, CellRole)> =
            cells.iter().map(|c| (c.at.to_string(), c.role)).collect();
        assert_eq!(
            roles,
            vec![
                ("A1".to_string(), CellRole::Anchor),
                ("B1".to_string(), CellRole::Ordinary),
                ("A2".to_string(), CellRole::MergedMember),
            ]
        );
    }

    #[test]
    fn test_write_log_holds_only_real_writes() {
        let mut book = sample();
        book.write_value("Dados", CellRef::new(5, 3), &CellContent::Empty)
            .unwrap();
        book.write_value("Dados", CellRef::new(1, 1), &CellContent::Text("Hi".into()))
            .unwrap();

        assert!(book.sheet("Dados").unwrap().get("C5").is_none());
        assert_eq!(book.write_log, vec![("Dados".to_string(), CellRef::new(1, 1))]);
    }

    #[test]
    fn test_merge_conflict() {
        let mut book = sample();
        let err = book.merge("Dados", &"A2:B2".parse().unwrap()).unwrap_err();
        assert!(matches!(err, TranslatorError::MergeConflict { .. }));
        assert!(book.merge("Dados", &"C1:D1".parse().unwrap()).is_ok());
    }

    #[test]
    fn test_unstyled_cell_has_no_style() {
        let book = sample();
        assert!(book.cell_style("Dados", CellRef::new(1, 2)).unwrap().is_none());
        assert!(book.cell_style("Dados", CellRef::new(1, 1)).unwrap().is_some());
    }

    #[test]
    fn test_protected_sheet_rejects_writes() {
        let mut book = sample();
        book.sheet_mut("Dados").unwrap().protected = true;
        let result = book.write_value("Dados", CellRef::new(1, 1), &CellContent::Empty);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.json");
        let book = sample();
        book.save(&path).unwrap();

        let loaded = MemoryWorkbook::open(&path).unwrap();
        assert_eq!(loaded.sheet_names(), vec!["Dados"]);
        let sheet = loaded.sheet("Dados").unwrap();
        assert_eq!(sheet.content("A1"), CellContent::Text("Olá".to_string()));
        assert_eq!(sheet.merges, vec!["A1:A2".parse::<RangeRef>().unwrap()]);
    }

    #[test]
    fn test_missing_sheet() {
        let book = sample();
        assert!(matches!(
            book.cells("Nope"),
            Err(TranslatorError::SheetNotFound(_))
        ));
    }
}
