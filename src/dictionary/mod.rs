//! Dictionary provider: per-language scrape rules applied to public dictionary pages.

pub mod rules;
mod scraper;

pub use scraper::ScrapeDictionary;

use std::path::PathBuf;

use async_trait::async_trait;

use rules::RuleError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryOutcome {
    Found { sentences: Vec<String> },
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("invalid dictionary rules in {}: {source}", path.display())]
    InvalidRules {
        path: PathBuf,
        #[source]
        source: RuleError,
    },

    #[error("cannot read dictionary rules {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Entry point for word lookups. A language without rules is unsupported rather than an error.
#[async_trait]
pub trait Dictionary: Send + Sync {
    /// Loads the rules for `language` once. `None` when the language has no dictionary.
    async fn open(&self, language: &str) -> Result<Option<Box<dyn WordLookup>>, DictionaryError>;
}

/// Lookups against one language's rules, fixed at the time they were opened.
#[async_trait]
pub trait WordLookup: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<DictionaryOutcome, DictionaryError>;
}
