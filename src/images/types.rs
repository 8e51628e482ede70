use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CompositeResponse {
    pub d: Option<CompositeData>,
}

#[derive(Debug, Deserialize)]
pub struct CompositeData {
    #[serde(default)]
    pub results: Vec<CompositeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompositeResult {
    #[serde(default)]
    pub image: Vec<ImageResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageResult {
    pub thumbnail: Thumbnail,
}

/// Dimensions arrive as strings from the legacy API; numbers are tolerated and stringified.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Thumbnail {
    pub media_url: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub width: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub height: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
