//! Error display and source-chain tests

use sheet_translator::error::TranslatorError;
use std::error::Error;
use std::path::PathBuf;

#[test]
fn test_input_not_found_display() {
    let err = TranslatorError::InputNotFound(PathBuf::from("Mapa.xlsm"));
    assert_eq!(err.to_string(), "Input file not found: Mapa.xlsm");
}

#[test]
fn test_copy_error_keeps_io_source() {
    let err = TranslatorError::Copy {
        from: PathBuf::from("a.xlsx"),
        to: PathBuf::from("b.xlsx"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
    };
    assert!(err.to_string().contains("a.xlsx"));
    assert!(err.to_string().contains("b.xlsx"));
    assert_eq!(err.source().unwrap().to_string(), "locked");
}

#[test]
fn test_merge_conflict_display() {
    let err = TranslatorError::MergeConflict {
        range: "B2:C3".to_string(),
        existing: "A1:B2".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot merge B2:C3: overlaps merged range A1:B2"
    );
}

#[test]
fn test_sheet_failed_reports_completed_and_cause() {
    let err = TranslatorError::SheetFailed {
        sheet: "Resumo".to_string(),
        completed: vec!["Plan1".to_string(), "Plan2".to_string()],
        source: Box::new(TranslatorError::Workbook("disk full".to_string())),
    };
    let msg = err.to_string();
    assert!(msg.contains("Resumo"));
    assert!(msg.contains("2 completed"));
    assert!(msg.contains("disk full"));
    assert_eq!(
        err.source().unwrap().to_string(),
        "Workbook error: disk full"
    );
}

#[test]
fn test_io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: TranslatorError = io.into();
    assert!(matches!(err, TranslatorError::Io(_)));
}

#[test]
fn test_yaml_error_converts() {
    let yaml: Result<Vec<u32>, _> = serde_yaml::from_str("[1, two");
    let err: TranslatorError = yaml.unwrap_err().into();
    assert!(err.to_string().starts_with("YAML parsing error"));
}
