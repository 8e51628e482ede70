//! Page download for the dictionary scraper, with a size cap and scheme check.

pub mod converter;

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

const MAX_RESPONSE_BYTES: usize = 10_000_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: must be HTTP(S)")]
    InvalidScheme,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed: status {0}")]
    Status(u16),

    #[error("response too large (>{} bytes)", MAX_RESPONSE_BYTES)]
    TooLarge,
}

/// Downloads `url` and returns the body decoded lossily as UTF-8.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let parsed = validate_url(url)?;

    let response = client
        .get(parsed)
        .header("User-Agent", crate::USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    if let Some(len) = response.content_length()
        && len as usize > MAX_RESPONSE_BYTES
    {
        return Err(FetchError::TooLarge);
    }

    let mut body = Vec::new();
    let mut stream = response;
    while let Some(chunk) = stream.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(FetchError::TooLarge);
        }
    }

    debug!(url = %url, bytes = body.len(), "page fetched");
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn validate_url(raw: &str) -> Result<url::Url, FetchError> {
    let parsed = url::Url::parse(raw)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(FetchError::InvalidScheme),
    }
}
