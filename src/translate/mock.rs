//! Deterministic, network-free translator for tests and dry runs.
//!
//! Every call is counted per input text, so tests can check how often the
//! backend was reached.

use super::translator::TextTranslator;
use crate::error::{TranslatorError, TranslatorResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// How the mock answers
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target code: "Olá" → "Olá_en"
    Suffix,
    /// Fixed source → translation pairs; unknown text gets the suffix
    Dictionary(HashMap<String, String>),
    /// Every call fails with this message
    Error(String),
    /// Return the input unchanged
    NoOp,
}

#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Calls that fail before the mode applies
    fail_first: Cell<u32>,
    /// Texts that always fail, regardless of mode
    failing_texts: Vec<String>,
    calls: RefCell<HashMap<String, u32>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            fail_first: Cell::new(0),
            failing_texts: Vec::new(),
            calls: RefCell::new(HashMap::new()),
        }
    }

    pub fn suffix() -> Self {
        Self::new(MockMode::Suffix)
    }

    pub fn dictionary<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(MockMode::Dictionary(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    pub fn always_failing() -> Self {
        Self::new(MockMode::Error("service unavailable".to_string()))
    }

    /// Fail the next `n` calls, then behave normally
    pub fn failing_first(self, n: u32) -> Self {
        self.fail_first.set(n);
        self
    }

    /// Always fail for this exact text
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing_texts.push(text.to_string());
        self
    }

    pub fn calls_for(&self, text: &str) -> u32 {
        self.calls.borrow().get(text).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.borrow().values().sum()
    }
}

impl TextTranslator for MockTranslator {
    fn translate(&self, text: &str, _source: &str, target: &str) -> TranslatorResult<String> {
        *self.calls.borrow_mut().entry(text.to_string()).or_insert(0) += 1;

        let pending = self.fail_first.get();
        if pending > 0 {
            self.fail_first.set(pending - 1);
            return Err(TranslatorError::Translation("simulated outage".to_string()));
        }
        if self.failing_texts.iter().any(|t| t == text) {
            return Err(TranslatorError::Translation(format!(
                "simulated failure for '{}'",
                text
            )));
        }

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Dictionary(map) => Ok(map
                .get(text)
                .cloned()
                .unwrap_or_else(|| format!("{}_{}", text, target))),
            MockMode::Error(msg) => Err(TranslatorError::Translation(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
