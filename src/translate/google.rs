//! Google Translate backend
//!
//! Two endpoints are supported:
//!
//! - the keyless public endpoint (`translate_a/single?client=gtx`), used when
//!   no API key is configured;
//! - Cloud Translation API v2, used when an API key is given (usually through
//!   the `GOOGLE_TRANSLATE_API_KEY` environment variable).
//!
//! Both are called with a blocking client; the job sends one request at a time.

use super::translator::{normalize_language, validate_language, TextTranslator};
use crate::error::{TranslatorError, TranslatorResult};
use serde_json::{json, Value};
use std::time::Duration;

const PUBLIC_URL: &str = "https://translate.googleapis.com/translate_a/single";
const CLOUD_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Clone)]
enum Endpoint {
    Public,
    Cloud { api_key: String },
}

#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::blocking::Client,
    endpoint: Endpoint,
}

impl GoogleTranslator {
    /// The public endpoint rejects longer requests
    pub const MAX_CHARS: usize = 5_000;

    /// Keyless client for the public endpoint
    pub fn public() -> TranslatorResult<Self> {
        Ok(Self {
            client: Self::build_client()?,
            endpoint: Endpoint::Public,
        })
    }

    /// Cloud Translation v2 client
    pub fn with_api_key(api_key: String) -> TranslatorResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslatorError::Config("API key cannot be empty".to_string()));
        }
        Ok(Self {
            client: Self::build_client()?,
            endpoint: Endpoint::Cloud { api_key },
        })
    }

    /// Cloud client when a key is given, public client otherwise
    pub fn from_key(api_key: Option<String>) -> TranslatorResult<Self> {
        match api_key {
            Some(key) if !key.trim().is_empty() => Self::with_api_key(key),
            _ => Self::public(),
        }
    }

    fn build_client() -> TranslatorResult<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("sheet-translator/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }

    fn translate_public(&self, text: &str, source: &str, target: &str) -> TranslatorResult<String> {
        let response = self
            .client
            .get(PUBLIC_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?;
        let body = Self::check_status(response)?;
        parse_public_response(&body)
    }

    fn translate_cloud(
        &self,
        api_key: &str,
        text: &str,
        source: &str,
        target: &str,
    ) -> TranslatorResult<String> {
        let body = json!({
            "q": [text],
            "source": source,
            "target": target,
            "format": "text"
        });
        let response = self
            .client
            .post(CLOUD_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()?;
        let body = Self::check_status(response)?;
        parse_cloud_response(&body)
    }

    fn check_status(response: reqwest::blocking::Response) -> TranslatorResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslatorError::Translation(format!(
                "API error ({}): {}",
                status, text
            )));
        }
        response
            .json()
            .map_err(|e| TranslatorError::Translation(format!("Failed to parse API response: {}", e)))
    }
}

impl std::fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let endpoint = match &self.endpoint {
            Endpoint::Public => "public",
            Endpoint::Cloud { .. } => "cloud (key ***)",
        };
        f.debug_struct("GoogleTranslator")
            .field("endpoint", &endpoint)
            .finish()
    }
}

impl TextTranslator for GoogleTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> TranslatorResult<String> {
        validate_language(source)?;
        validate_language(target)?;

        if text.chars().count() > Self::MAX_CHARS {
            return Err(TranslatorError::Translation(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS
            )));
        }

        let source = normalize_language(source);
        let target = normalize_language(target);
        match &self.endpoint {
            Endpoint::Public => self.translate_public(text, &source, &target),
            Endpoint::Cloud { api_key } => self.translate_cloud(api_key, text, &source, &target),
        }
    }

    fn provider_name(&self) -> &str {
        match self.endpoint {
            Endpoint::Public => "Google Translate (public)",
            Endpoint::Cloud { .. } => "Google Cloud Translation v2",
        }
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["Hello ","Olá ",...],["world","mundo",...]],null,"pt",...]`.
pub fn parse_public_response(body: &Value) -> TranslatorResult<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            TranslatorError::Translation("Invalid API response: missing segment list".to_string())
        })?;

    let mut out = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            out.push_str(part);
        }
    }
    if out.is_empty() {
        return Err(TranslatorError::Translation(
            "Invalid API response: no translated text".to_string(),
        ));
    }
    Ok(out)
}

/// Read `data.translations[0].translatedText` from a Cloud v2 response
pub fn parse_cloud_response(body: &Value) -> TranslatorResult<String> {
    body["data"]["translations"]
        .get(0)
        .and_then(|t| t["translatedText"].as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            TranslatorError::Translation(
                "Invalid API response: missing 'data.translations[0].translatedText'".to_string(),
            )
        })
}
