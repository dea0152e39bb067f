use super::address::{CellRef, RangeRef};
use serde::{Deserialize, Serialize};

//==============================================================================
// Cell content
//==============================================================================

/// Value held by a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellContent {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula (without the leading `=`) plus its cached result, if any
    Formula { formula: String, cached: Option<String> },
    /// Error literal such as `#N/A`
    Error(String),
}

impl CellContent {
    /// Text worth sending to the translator: a literal string with at least
    /// one non-whitespace character
    pub fn translatable_text(&self) -> Option<&str> {
        match self {
            CellContent::Text(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Empty
    }
}

//==============================================================================
// Cell classification
//==============================================================================

/// How a cell relates to the sheet's merged ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellRole {
    /// Top-left cell of a merged range; holds the range's value
    Anchor,
    /// Non-anchor cell inside a merged range; never read or written
    MergedMember,
    Ordinary,
}

impl CellRole {
    /// Classify a position against the sheet's merge set
    pub fn classify(cell: CellRef, merges: &[RangeRef]) -> Self {
        for range in merges {
            if range.contains(cell) {
                return if range.anchor() == cell {
                    CellRole::Anchor
                } else {
                    CellRole::MergedMember
                };
            }
        }
        CellRole::Ordinary
    }

    pub fn is_member(&self) -> bool {
        matches!(self, CellRole::MergedMember)
    }
}

/// One enumerated cell of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub at: CellRef,
    pub content: CellContent,
    pub role: CellRole,
}

/// Sort cells row-major (row, then column)
pub fn sort_row_major(cells: &mut [SheetCell]) {
    cells.sort_by_key(|c| (c.at.row, c.at.col));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translatable_text() {
        assert_eq!(
            CellContent::Text("Olá".to_string()).translatable_text(),
            Some("Olá")
        );
        assert_eq!(
            CellContent::Text("  Olá ".to_string()).translatable_text(),
            Some("  Olá ")
        );
        assert_eq!(CellContent::Text("   ".to_string()).translatable_text(), None);
        assert_eq!(CellContent::Text(String::new()).translatable_text(), None);
        assert_eq!(CellContent::Number(42.0).translatable_text(), None);
        assert_eq!(
            CellContent::Formula {
                formula: "A1&\"x\"".to_string(),
                cached: Some("texto".to_string())
            }
            .translatable_text(),
            None
        );
    }

    #[test]
    fn test_classify() {
        let merges: Vec<RangeRef> = vec!["A1:A2".parse().unwrap(), "C3:D4".parse().unwrap()];
        assert_eq!(CellRole::classify(CellRef::new(1, 1), &merges), CellRole::Anchor);
        assert_eq!(
            CellRole::classify(CellRef::new(2, 1), &merges),
            CellRole::MergedMember
        );
        assert_eq!(
            CellRole::classify(CellRef::new(4, 4), &merges),
            CellRole::MergedMember
        );
        assert_eq!(CellRole::classify(CellRef::new(3, 3), &merges), CellRole::Anchor);
        assert_eq!(CellRole::classify(CellRef::new(1, 2), &merges), CellRole::Ordinary);
    }

    #[test]
    fn test_sort_row_major() {
        let mut cells = vec![
            SheetCell {
                at: CellRef::new(2, 1),
                content: CellContent::Empty,
                role: CellRole::Ordinary,
            },
            SheetCell {
                at: CellRef::new(1, 3),
                content: CellContent::Empty,
                role: CellRole::Ordinary,
            },
            SheetCell {
                at: CellRef::new(1, 1),
                content: CellContent::Empty,
                role: CellRole::Ordinary,
            },
        ];
        sort_row_major(&mut cells);
        let order: Vec<String> = cells.iter().map(|c| c.at.to_string()).collect();
        assert_eq!(order, vec!["A1", "C1", "A2"]);
    }
}
