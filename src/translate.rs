//! Prompt translation into the language the model was trained on.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::config::TranslationSettings;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation service returned HTTP {0}")]
    Status(u16),
    #[error("unexpected translation response: {0}")]
    Malformed(String),
    #[error("translation came back empty")]
    Empty,
}

pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

/// Hands the prompt through unchanged.
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// Google-style `translate_a/single` web endpoint (`client=gtx`).
pub struct WebTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
    source: String,
    target: String,
}

impl WebTranslator {
    pub fn new(
        endpoint: &str,
        source: &str,
        target: &str,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

impl Translator for WebTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?;

        if !resp.status().is_success() {
            return Err(TranslateError::Status(resp.status().as_u16()));
        }

        let value: Value = resp.json()?;
        parse_gtx_response(&value)
    }
}

/// Pull the translated text out of a `client=gtx` reply.
///
/// The reply is `[[["<translated>", "<original>", ...], ...], ...]`; long
/// inputs are split into several segments that have to be joined back.
pub fn parse_gtx_response(value: &Value) -> Result<String, TranslateError> {
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing segment list".to_string()))?;

    let mut out = String::new();
    for segment in segments {
        match segment.get(0) {
            Some(Value::String(s)) => out.push_str(s),
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(TranslateError::Malformed(format!(
                    "segment is not a string: {other}"
                )));
            }
        }
    }

    let out = out.trim().to_string();
    if out.is_empty() {
        return Err(TranslateError::Empty);
    }
    Ok(out)
}

/// Build the configured translator.
pub fn from_settings(settings: &TranslationSettings) -> Result<Box<dyn Translator>, TranslateError> {
    let same_language = settings
        .source_lang
        .trim()
        .eq_ignore_ascii_case(settings.target_lang.trim());
    if !settings.enabled || same_language {
        return Ok(Box::new(Passthrough));
    }

    Ok(Box::new(WebTranslator::new(
        &settings.endpoint,
        &settings.source_lang,
        &settings.target_lang,
        Duration::from_secs(settings.timeout_secs),
    )?))
}
