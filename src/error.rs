use std::path::PathBuf;
use thiserror::Error;

pub type TranslatorResult<T> = Result<T, TranslatorError>;

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid cell address: {0}")]
    Address(String),

    #[error("Cannot merge {range}: overlaps merged range {existing}")]
    MergeConflict { range: String, existing: String },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sheet '{sheet}' failed after {} completed sheet(s): {source}", .completed.len())]
    SheetFailed {
        sheet: String,
        completed: Vec<String>,
        #[source]
        source: Box<TranslatorError>,
    },
}

impl From<umya_spreadsheet::XlsxError> for TranslatorError {
    fn from(err: umya_spreadsheet::XlsxError) -> Self {
        TranslatorError::Workbook(err.to_string())
    }
}
