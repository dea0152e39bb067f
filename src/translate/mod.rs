//! Translation client
//!
//! - `translator`: the backend trait and language-code helpers
//! - `google`: Google Translate over blocking HTTP
//! - `retry`: the adapter the pipeline calls (retry, linear backoff, passthrough)
//! - `mock`: deterministic backend for tests

pub mod google;
pub mod mock;
pub mod retry;
pub mod translator;

pub use google::GoogleTranslator;
pub use mock::{MockMode, MockTranslator};
pub use retry::{
    NoSleep, RecordingSleeper, RetryPolicy, RetryingTranslator, Sleeper, ThreadSleeper,
    TranslationOutcome,
};
pub use translator::{normalize_language, validate_language, TextTranslator};
