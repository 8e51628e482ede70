//! Translation provider: the `Translator` contract and the Google Translate v2 adapter.

pub mod client;
pub mod types;

pub use client::{GoogleTranslator, TranslateError};

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Translated {
        text: String,
        detected_source: Option<String>,
    },
    /// The provider cannot translate between the requested languages.
    UnsupportedPair,
    /// Structured failure payload reported by the provider, already serialized.
    ProviderError { message: String },
}

/// Abstraction over a translation backend.
/// Implemented by `GoogleTranslator` for production; test doubles substitute it.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationOutcome, TranslateError>;

    async fn detect(&self, text: &str) -> Result<String, TranslateError>;
}
