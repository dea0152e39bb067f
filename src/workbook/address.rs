//! A1-style cell and range addresses.
//!
//! Rows and columns are 1-based, matching what Excel shows and what the
//! document model expects. `$` anchors are accepted and dropped.

use crate::error::{TranslatorError, TranslatorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest column Excel supports (XFD)
pub const MAX_COLUMN: u32 = 16_384;
/// Largest row Excel supports
pub const MAX_ROW: u32 = 1_048_576;

/// Convert a 1-based column number to letters (1 → A, 27 → AA)
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert column letters to a 1-based column number (A → 1, AA → 27)
pub fn column_number(letters: &str) -> TranslatorResult<u32> {
    if letters.is_empty() {
        return Err(TranslatorError::Address("missing column letters".to_string()));
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(TranslatorError::Address(format!(
                "invalid column '{}'",
                letters
            )));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        col = col * 26 + digit;
        if col > MAX_COLUMN {
            return Err(TranslatorError::Address(format!(
                "column '{}' is out of range",
                letters
            )));
        }
    }
    Ok(col)
}

/// A single cell position, serialised as its A1 address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl FromStr for CellRef {
    type Err = TranslatorError;

    fn from_str(s: &str) -> TranslatorResult<Self> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| TranslatorError::Address(format!("'{}' has no row number", s)))?;
        let (letters, digits) = cleaned.split_at(split);
        let col = column_number(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| TranslatorError::Address(format!("'{}' has an invalid row", s)))?;
        if row == 0 || row > MAX_ROW {
            return Err(TranslatorError::Address(format!(
                "row in '{}' is out of range",
                s
            )));
        }
        Ok(Self { row, col })
    }
}

impl TryFrom<String> for CellRef {
    type Error = TranslatorError;

    fn try_from(value: String) -> TranslatorResult<Self> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(cell: CellRef) -> Self {
        cell.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

/// A rectangular range; `start` is always the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    /// Build a range from two corners in any order
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// The anchor (top-left) cell that holds the visible value
    pub fn anchor(&self) -> CellRef {
        self.start
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }

    pub fn overlaps(&self, other: &RangeRef) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    pub fn cell_count(&self) -> u64 {
        (self.end.row - self.start.row + 1) as u64 * (self.end.col - self.start.col + 1) as u64
    }
}

impl FromStr for RangeRef {
    type Err = TranslatorError;

    fn from_str(s: &str) -> TranslatorResult<Self> {
        match s.split_once(':') {
            Some((a, b)) => Ok(Self::new(a.parse()?, b.parse()?)),
            None => {
                let cell: CellRef = s.parse()?;
                Ok(Self::new(cell, cell))
            }
        }
    }
}

impl TryFrom<String> for RangeRef {
    type Error = TranslatorError;

    fn try_from(value: String) -> TranslatorResult<Self> {
        value.parse()
    }
}

impl From<RangeRef> for String {
    fn from(range: RangeRef) -> Self {
        range.to_string()
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}
