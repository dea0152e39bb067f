//! Bounded retry around a translation backend.
//!
//! The adapter never fails: after `max_retries` failed attempts the original
//! text is returned unchanged (passthrough) and a warning is logged.
//!
//! Timing per call:
//! - after a successful attempt: sleep `delay` (rate limiting), then return
//! - after failed attempt `i` (0-based) with attempts left: sleep `delay * (i + 1)`
//! - after the last failed attempt: no sleep
//!
//! The backoff grows linearly, not exponentially.

use super::translator::TextTranslator;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry settings for the translation adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per text (at least 1)
    pub max_retries: u32,
    /// Base delay: slept after every success, multiplied for backoff
    #[serde(rename = "delay_ms", with = "millis")]
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Backoff slept after failed attempt `attempt_index` (0-based)
    pub fn backoff(&self, attempt_index: u32) -> Duration {
        self.delay.saturating_mul(attempt_index.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Where the adapter's pauses go
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Skips every pause
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

/// Records pauses instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Result of one adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: String,
    pub attempts: u32,
    /// False when every attempt failed and `text` is the original input
    pub translated: bool,
}

/// Translation client adapter: retry, backoff and passthrough
pub struct RetryingTranslator<T, S = ThreadSleeper> {
    backend: T,
    sleeper: S,
    policy: RetryPolicy,
    source: String,
    target: String,
}

impl<T: TextTranslator> RetryingTranslator<T, ThreadSleeper> {
    pub fn new(backend: T, policy: RetryPolicy, source: &str, target: &str) -> Self {
        Self::with_sleeper(backend, policy, source, target, ThreadSleeper)
    }
}

impl<T: TextTranslator, S: Sleeper> RetryingTranslator<T, S> {
    pub fn with_sleeper(
        backend: T,
        policy: RetryPolicy,
        source: &str,
        target: &str,
        sleeper: S,
    ) -> Self {
        Self {
            backend,
            sleeper,
            policy,
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Translate `text`, returning it unchanged if every attempt fails
    pub fn translate(&self, text: &str) -> String {
        self.translate_detailed(text).text
    }

    pub fn translate_detailed(&self, text: &str) -> TranslationOutcome {
        let max = self.policy.max_retries.max(1);
        for attempt in 0..max {
            match self.backend.translate(text, &self.source, &self.target) {
                Ok(translated) => {
                    self.sleeper.sleep(self.policy.delay);
                    return TranslationOutcome {
                        text: translated,
                        attempts: attempt + 1,
                        translated: true,
                    };
                }
                Err(e) if attempt + 1 < max => {
                    let backoff = self.policy.backoff(attempt);
                    debug!(
                        provider = self.backend.provider_name(),
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        "translation attempt failed: {}",
                        e
                    );
                    self.sleeper.sleep(backoff);
                }
                Err(e) => {
                    warn!(
                        provider = self.backend.provider_name(),
                        "Could not translate '{}' after {} attempts: {}",
                        text,
                        max,
                        e
                    );
                }
            }
        }
        TranslationOutcome {
            text: text.to_string(),
            attempts: max,
            translated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::mock::MockTranslator;
    use pretty_assertions::assert_eq;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(100))
    }

    #[test]
    fn test_success_sleeps_delay_once() {
        let mock = MockTranslator::dictionary([("Olá", "Hello")]);
        let sleeper = RecordingSleeper::new();
        let adapter = RetryingTranslator::with_sleeper(&mock, policy(), "pt", "en", &sleeper);

        let outcome = adapter.translate_detailed("Olá");
        assert_eq!(
            outcome,
            TranslationOutcome {
                text: "Hello".to_string(),
                attempts: 1,
                translated: true
            }
        );
        assert_eq!(sleeper.slept(), vec![Duration::from_millis(100)]);
        assert_eq!(mock.calls_for("Olá"), 1);
    }

    #[test]
    fn test_exhausted_retries_pass_through() {
        let mock = MockTranslator::always_failing();
        let sleeper = RecordingSleeper::new();
        let adapter = RetryingTranslator::with_sleeper(&mock, policy(), "pt", "en", &sleeper);

        let outcome = adapter.translate_detailed("Erro");
        assert_eq!(outcome.text, "Erro");
        assert_eq!(outcome.attempts, 3);
        assert!(!outcome.translated);
        assert_eq!(mock.calls_for("Erro"), 3);
        // Linear backoff between attempts, nothing after the last one
        assert_eq!(
            sleeper.slept(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[test]
    fn test_success_on_second_attempt() {
        let mock = MockTranslator::dictionary([("Olá", "Hello")]).failing_first(1);
        let sleeper = RecordingSleeper::new();
        let adapter = RetryingTranslator::with_sleeper(&mock, policy(), "pt", "en", &sleeper);

        let outcome = adapter.translate_detailed("Olá");
        assert_eq!(outcome.text, "Hello");
        assert_eq!(outcome.attempts, 2);
        // One backoff before the retry, then the post-success delay
        assert_eq!(
            sleeper.slept(),
            vec![Duration::from_millis(100), Duration::from_millis(100)]
        );
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let mock = MockTranslator::always_failing();
        let adapter = RetryingTranslator::with_sleeper(
            &mock,
            RetryPolicy::new(0, Duration::ZERO),
            "pt",
            "en",
            NoSleep,
        );
        assert_eq!(adapter.translate("x"), "x");
        assert_eq!(mock.total_calls(), 1);
    }

    #[test]
    fn test_backoff_is_linear() {
        let p = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(p.backoff(0), Duration::from_secs(1));
        assert_eq!(p.backoff(1), Duration::from_secs(2));
        assert_eq!(p.backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn test_policy_yaml_uses_millis() {
        let p: RetryPolicy = serde_yaml::from_str("max_retries: 5\ndelay_ms: 250\n").unwrap();
        assert_eq!(p, RetryPolicy::new(5, Duration::from_millis(250)));
    }
}
