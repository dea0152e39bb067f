//! Job configuration: optional YAML file, command-line overrides, defaults.
//!
//! Precedence is CLI flag, then file value, then default.
//!
//! ```yaml
//! source_lang: pt
//! target_lang: en
//! output: translated/Mapa.xlsm
//! retry:
//!   max_retries: 5
//!   delay_ms: 500
//! settle:
//!   kill_ms: 2000
//!   remove_ms: 1000
//! kill_process: true
//! process_name: EXCEL.EXE
//! discard_partial: false
//! ```

use crate::environment::{EnvironmentPreparer, NoopEnvironment, ProcessTerminator};
use crate::error::{TranslatorError, TranslatorResult};
use crate::job::JobOptions;
use crate::translate::{validate_language, RetryPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub settle: SettleConfig,
    pub kill_process: Option<bool>,
    pub process_name: Option<String>,
    pub discard_partial: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub max_retries: Option<u32>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettleConfig {
    pub kill_ms: Option<u64>,
    pub remove_ms: Option<u64>,
}

impl JobConfig {
    pub fn from_file(path: &Path) -> TranslatorResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TranslatorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> TranslatorResult<Self> {
        // An empty file is a valid, empty config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub max_retries: Option<u32>,
    pub delay_ms: Option<u64>,
    pub no_kill: bool,
    pub discard_partial: bool,
}

/// Everything a run needs, validated
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub job: JobOptions,
    pub kill_process: bool,
    pub process_name: String,
    pub kill_settle: Duration,
}

impl ResolvedConfig {
    pub fn resolve(file: Option<JobConfig>, cli: &CliOverrides) -> TranslatorResult<Self> {
        let file = file.unwrap_or_default();
        let defaults = JobOptions::default();

        let source_lang = cli
            .source_lang
            .clone()
            .or(file.source_lang)
            .unwrap_or(defaults.source_lang);
        let target_lang = cli
            .target_lang
            .clone()
            .or(file.target_lang)
            .unwrap_or(defaults.target_lang);
        validate_language(&source_lang)?;
        validate_language(&target_lang)?;

        let max_retries = cli
            .max_retries
            .or(file.retry.max_retries)
            .unwrap_or(defaults.retry.max_retries);
        if max_retries == 0 {
            return Err(TranslatorError::Config(
                "max_retries must be at least 1".to_string(),
            ));
        }
        let delay = cli
            .delay_ms
            .or(file.retry.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry.delay);

        let remove_settle = file
            .settle
            .remove_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.remove_settle);
        let kill_settle = file
            .settle
            .kill_ms
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(2));

        let process_name = file
            .process_name
            .unwrap_or_else(|| ProcessTerminator::DEFAULT_IMAGE.to_string());
        if process_name.trim().is_empty() {
            return Err(TranslatorError::Config(
                "process_name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            job: JobOptions {
                output: cli.output.clone().or(file.output),
                source_lang,
                target_lang,
                retry: RetryPolicy::new(max_retries, delay),
                remove_settle,
                discard_partial: cli.discard_partial || file.discard_partial.unwrap_or(false),
            },
            kill_process: !cli.no_kill && file.kill_process.unwrap_or(true),
            process_name,
            kill_settle,
        })
    }

    pub fn environment(&self) -> Box<dyn EnvironmentPreparer> {
        if self.kill_process {
            Box::new(ProcessTerminator::new(
                self.process_name.clone(),
                self.kill_settle,
            ))
        } else {
            Box::new(NoopEnvironment)
        }
    }
}
