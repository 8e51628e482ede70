use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub data: Option<TranslationsData>,
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TranslationsData {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    pub detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetectResponse {
    pub data: Option<DetectionsData>,
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DetectionsData {
    #[serde(default)]
    pub detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
pub struct Detection {
    pub language: String,
}

/// Only used to tell a structured error body apart from an opaque one.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub error: Option<Value>,
}
