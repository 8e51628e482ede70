use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::CompositeResponse;
use super::{ImageSearch, MediaKind, RawImageHit, SearchOptions};
use crate::config::ApiKey;

const API_BASE: &str = "https://api.datamarket.azure.com/Bing/Search/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum ImageSearchError {
    #[error("BING_API_KEY not set")]
    ApiKeyNotSet,

    /// Failure payload reported by the provider, serialized for display.
    #[error("API error ({status}): {payload}")]
    Api { status: u16, payload: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Client for the Bing Search Composite endpoint.
#[derive(Clone)]
pub struct BingImages {
    http: Client,
    api_key: Option<ApiKey>,
    base_url: String,
}

impl BingImages {
    pub fn new(http: Client, api_key: Option<ApiKey>) -> Self {
        if api_key.is_none() {
            warn!("BING_API_KEY not set, image searches will fail");
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
}

#[async_trait]
impl ImageSearch for BingImages {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<RawImageHit>, ImageSearchError> {
        let key = self.api_key.as_ref().ok_or(ImageSearchError::ApiKeyNotSet)?;

        let mut url = Url::parse(&format!("{}/Composite", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("Sources", &quote(kind.as_source()))
            .append_pair("Query", &quote(query))
            .append_pair("$format", options.format)
            .append_pair("$top", &options.top.to_string())
            .append_pair("$skip", &options.skip.to_string());

        let response = self
            .http
            .get(url)
            .basic_auth("", Some(key.expose()))
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let payload = serialize_payload(&text);
            warn!(status = %status, "Bing search error");
            return Err(ImageSearchError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        let body: CompositeResponse = serde_json::from_str(&text)
            .map_err(|e| ImageSearchError::UnexpectedResponse(format!("invalid JSON: {e}")))?;

        let result = body
            .d
            .and_then(|d| d.results.into_iter().next())
            .ok_or_else(|| {
                ImageSearchError::UnexpectedResponse("no composite result in response".to_string())
            })?;

        let hits: Vec<RawImageHit> = result
            .image
            .into_iter()
            .map(|image| RawImageHit {
                media_url: image.thumbnail.media_url,
                width: image.thumbnail.width,
                height: image.thumbnail.height,
            })
            .collect();

        debug!(hits = hits.len(), "image search complete");
        Ok(hits)
    }
}

/// Wraps a value in single quotes as the OData query syntax expects, doubling embedded quotes.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Re-serializes JSON bodies compactly; anything else is passed through trimmed.
fn serialize_payload(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|value| value.to_string())
        .unwrap_or_else(|_| text.trim().to_string())
}
