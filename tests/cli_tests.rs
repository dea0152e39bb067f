//! Binary tests for the sheet-translate CLI
//!
//! None of these reach the translation service: each translate run fails on
//! input or configuration before any text is sent.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use sheet_translator::workbook::{MemoryWorkbook, Workbook};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("sheet-translate").unwrap();
    cmd.env_remove("GOOGLE_TRANSLATE_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_json(dir: &TempDir) -> PathBuf {
    let mut book = MemoryWorkbook::new();
    let sheet = book.add_sheet("Plan1");
    sheet
        .set_text("A1", "Olá")
        .set_text("B1", "Olá")
        .set_text("A2", "Mundo")
        .add_merge("A2:B2");
    sheet.column_widths.insert(1, 25.0);
    let path = dir.path().join("plan.json");
    book.save(&path).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_help_lists_commands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_translate_help_shows_flags() {
    bin()
        .args(["translate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-retries"))
        .stdout(predicate::str::contains("--discard-partial"))
        .stdout(predicate::str::contains("--no-kill"));
}

#[test]
fn test_version() {
    bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ═══════════════════════════════════════════════════════════════════════════
// TRANSLATE FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_translate_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Mapa.xlsm");

    bin()
        .arg("translate")
        .arg(&input)
        .arg("--no-kill")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));

    assert!(!dir.path().join("Mapa_translated.xlsm").exists());
}

#[test]
fn test_translate_rejects_zero_retries() {
    let dir = TempDir::new().unwrap();
    let input = sample_json(&dir);

    bin()
        .arg("translate")
        .arg(&input)
        .args(["--no-kill", "--max-retries", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_retries"));

    assert!(!dir.path().join("plan_translated.json").exists());
}

#[test]
fn test_translate_rejects_unknown_config_key() {
    let dir = TempDir::new().unwrap();
    let input = sample_json(&dir);
    let config = dir.path().join("job.yaml");
    fs::write(&config, "source_lang: pt\ntarget_language: en\n").unwrap();

    bin()
        .arg("translate")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--no-kill")
        .assert()
        .failure()
        .stderr(predicate::str::contains("target_language"));
}

#[test]
fn test_translate_rejects_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("old.xls");
    fs::write(&input, b"legacy").unwrap();

    bin()
        .arg("translate")
        .arg(&input)
        .arg("--no-kill")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported workbook format"));
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_prints_structure() {
    let dir = TempDir::new().unwrap();
    let input = sample_json(&dir);

    bin()
        .arg("inspect")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan1"))
        .stdout(predicate::str::contains("A2:B2"))
        .stdout(predicate::str::contains("A=25"))
        .stdout(predicate::str::contains("Distinct texts: 2"));
}

#[test]
fn test_inspect_json() {
    let dir = TempDir::new().unwrap();
    let input = sample_json(&dir);

    let output = bin()
        .args(["inspect", "--json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "Plan1");
    assert_eq!(value[0]["translatable_cells"], 3);
    assert_eq!(value[0]["snapshot"]["merged_ranges"][0], "A2:B2");
}

#[test]
fn test_inspect_missing_file() {
    bin()
        .args(["inspect", "does-not-exist.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
