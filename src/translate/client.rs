use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::types::{DetectResponse, ErrorBody, TranslateResponse};
use super::{TranslationOutcome, Translator};
use crate::config::ApiKey;

const API_BASE: &str = "https://translation.googleapis.com/language/translate/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Google reports untranslatable pairs with this literal message (placeholder included).
const BAD_LANGUAGE_PAIR: &str = "Bad language pair: {0}";

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("GOOGLE_TRANSLATE_API_KEY not set")]
    ApiKeyNotSet,

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct GoogleTranslator {
    http: Client,
    api_key: Option<ApiKey>,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(http: Client, api_key: Option<ApiKey>) -> Self {
        if api_key.is_none() {
            warn!("GOOGLE_TRANSLATE_API_KEY not set, translation requests will fail");
        }
        Self {
            http,
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: Some(ApiKey::new("test-key")),
            base_url: base_url.to_string(),
        }
    }

    async fn get_once(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<String, TranslateError> {
        let key = self.api_key.as_ref().ok_or(TranslateError::ApiKeyNotSet)?;

        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("key", key.expose())
            .extend_pairs(params);

        debug_assert!(
            url.scheme() == "https" || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() || has_structured_error(&text) {
            return Ok(text);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Google Translate rate limited");
            return Err(TranslateError::RateLimited);
        }

        let end = text.floor_char_boundary(200);
        warn!(status = %status, "Google Translate error (no structured body)");
        Err(TranslateError::Api {
            code: status.as_u16(),
            message: format!("HTTP {status}: {}", &text[..end]),
        })
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<String, TranslateError> {
        let mut last_err = None;
        for attempt in 0..MAX_RETRIES {
            match self.get_once(path, params).await {
                Ok(body) => return Ok(body),
                Err(e) if is_retriable(&e) => {
                    last_err = Some(e);
                    if attempt + 1 < MAX_RETRIES {
                        let delay_ms = jittered_backoff(attempt);
                        debug!(
                            attempt = attempt + 1,
                            delay_ms, "retrying after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(TranslateError::RateLimited))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationOutcome, TranslateError> {
        let mut params = vec![("q", text), ("target", target), ("format", "text")];
        if !source.is_empty() {
            params.push(("source", source));
        }

        let body = self.get("", &params).await?;
        let response: TranslateResponse = decode(&body)?;

        if let Some(error) = response.error {
            let outcome = classify_api_error(error);
            warn!(outcome = ?outcome, "Google Translate returned an error payload");
            return Ok(outcome);
        }

        let translation = response
            .data
            .and_then(|d| d.translations.into_iter().next())
            .ok_or_else(|| {
                TranslateError::UnexpectedResponse("no translation in response".to_string())
            })?;

        debug!(
            detected = ?translation.detected_source_language,
            "translation complete"
        );
        Ok(TranslationOutcome::Translated {
            text: translation.translated_text,
            detected_source: translation
                .detected_source_language
                .filter(|lang| !lang.is_empty()),
        })
    }

    async fn detect(&self, text: &str) -> Result<String, TranslateError> {
        let body = self.get("/detect", &[("q", text)]).await?;
        let response: DetectResponse = decode(&body)?;

        if let Some(error) = response.error {
            return Err(TranslateError::Rejected(error.to_string()));
        }

        let language = response
            .data
            .and_then(|d| d.detections.into_iter().flatten().next())
            .map(|d| d.language)
            .ok_or_else(|| {
                TranslateError::UnexpectedResponse("no detection in response".to_string())
            })?;

        debug!(%language, "language detected");
        Ok(language)
    }
}

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

fn is_retriable(e: &TranslateError) -> bool {
    matches!(
        e,
        TranslateError::RateLimited
            | TranslateError::Api {
                code: 500..=599,
                ..
            }
    )
}

/// Equal jitter backoff: base/2 + rand(0, base/2).
fn jittered_backoff(attempt: u32) -> u64 {
    let base = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
    let half = base / 2;
    half + fastrand::u64(..half.max(1))
}

fn has_structured_error(text: &str) -> bool {
    serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|body| body.error)
        .is_some()
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, TranslateError> {
    serde_json::from_str(body)
        .map_err(|e| TranslateError::UnexpectedResponse(format!("invalid JSON: {e}")))
}

fn classify_api_error(error: Value) -> TranslationOutcome {
    let is_bad_pair = error.get("message").and_then(Value::as_str) == Some(BAD_LANGUAGE_PAIR);
    if is_bad_pair {
        TranslationOutcome::UnsupportedPair
    } else {
        TranslationOutcome::ProviderError {
            message: error.to_string(),
        }
    }
}
