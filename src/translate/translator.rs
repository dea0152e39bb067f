//! Translation backend trait and language-code helpers

use crate::error::{TranslatorError, TranslatorResult};

/// A remote (or stubbed) text translation service.
///
/// Calls may fail transiently; callers are expected to wrap a backend in
/// [`RetryingTranslator`](super::RetryingTranslator) rather than call it directly.
pub trait TextTranslator {
    /// Translate `text` from `source` to `target` language code
    fn translate(&self, text: &str, source: &str, target: &str) -> TranslatorResult<String>;

    /// Name used in logs
    fn provider_name(&self) -> &str;
}

impl<T: TextTranslator + ?Sized> TextTranslator for &T {
    fn translate(&self, text: &str, source: &str, target: &str) -> TranslatorResult<String> {
        (**self).translate(text, source, target)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<T: TextTranslator + ?Sized> TextTranslator for Box<T> {
    fn translate(&self, text: &str, source: &str, target: &str) -> TranslatorResult<String> {
        (**self).translate(text, source, target)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// Canonical spelling of a language tag, subtags kept.
///
/// `_` becomes `-`, the language is lowercased, two-letter regions are
/// uppercased and four-letter scripts are titlecased (`zh_tw` → `zh-TW`,
/// `ZH-hant` → `zh-Hant`).
pub fn normalize_language(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .enumerate()
        .map(|(i, part)| match (i, part.len()) {
            (0, _) => part.to_ascii_lowercase(),
            (_, 2) if part.chars().all(|c| c.is_ascii_alphabetic()) => part.to_ascii_uppercase(),
            (_, 4) if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                let lower = part.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => lower,
                }
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Accept non-empty codes made of ASCII alphanumerics, `-` and `_`
pub fn validate_language(code: &str) -> TranslatorResult<()> {
    if code.trim().is_empty() {
        return Err(TranslatorError::Config(
            "language code is empty".to_string(),
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TranslatorError::Config(format!(
            "invalid characters in language code: {}",
            code
        )));
    }
    Ok(())
}
