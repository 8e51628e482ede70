//! Image search provider: the `ImageSearch` contract and the Bing adapter.

pub mod client;
pub mod types;

pub use client::{BingImages, ImageSearchError};

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
}

impl MediaKind {
    pub fn as_source(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub format: &'static str,
    pub top: u32,
    pub skip: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageHit {
    pub media_url: String,
    pub width: String,
    pub height: String,
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<RawImageHit>, ImageSearchError>;
}
