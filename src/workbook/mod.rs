//! Spreadsheet document model adapter
//!
//! - `address`: A1 cell/range parsing
//! - `model`: cell content and merge classification
//! - `document`: the `Workbook` trait the pipeline runs against
//! - `xlsx`: real `.xlsx`/`.xlsm` files through umya-spreadsheet
//! - `memory`: JSON-backed in-memory workbook

pub mod address;
mod document;
pub mod memory;
pub mod model;
mod xlsx;

pub use address::{CellRef, RangeRef};
pub use document::Workbook;
pub use memory::{MemorySheet, MemoryStyle, MemoryWorkbook};
pub use model::{CellContent, CellRole, SheetCell};
pub use xlsx::XlsxWorkbook;
