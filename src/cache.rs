//! Per-sheet translation cache
//!
//! Keys are the exact source strings (whitespace included). A fresh cache is
//! built for every sheet, so identical text on two sheets is translated twice.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<String, String>,
    hits: usize,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached translation of `source`, translating it with `f` on
    /// the first request. `f` runs at most once per distinct key.
    pub fn get_or_translate<F>(&mut self, source: &str, f: F) -> &str
    where
        F: FnOnce(&str) -> String,
    {
        if self.entries.contains_key(source) {
            self.hits += 1;
        } else {
            let translated = f(source);
            self.entries.insert(source.to_string(), translated);
        }
        &self.entries[source]
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Number of distinct source strings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered without calling the translator
    pub fn hits(&self) -> usize {
        self.hits
    }
}
