use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::rules::{Ruleset, load_rules};
use super::{Dictionary, DictionaryError, DictionaryOutcome, WordLookup};
use crate::fetch::{self, converter::fragment_to_text};

/// Looks words up by scraping the page named in `<rules_dir>/<language>.json`.
///
/// Rule files are read on every `open`, so edits apply to the next query
/// without a restart. A page that cannot be fetched counts as a miss.
#[derive(Clone)]
pub struct ScrapeDictionary {
    http: Client,
    rules_dir: PathBuf,
}

impl ScrapeDictionary {
    pub fn new(http: Client, rules_dir: PathBuf) -> Self {
        if !rules_dir.is_dir() {
            warn!(dir = %rules_dir.display(), "dictionary rules directory not found, definitions disabled");
        }
        Self { http, rules_dir }
    }
}

#[async_trait]
impl Dictionary for ScrapeDictionary {
    async fn open(&self, language: &str) -> Result<Option<Box<dyn WordLookup>>, DictionaryError> {
        let Some(rules) = load_rules(&self.rules_dir, language).await? else {
            return Ok(None);
        };
        Ok(Some(Box::new(ScrapeLookup {
            http: self.http.clone(),
            language: language.to_string(),
            rules,
        })))
    }
}

struct ScrapeLookup {
    http: Client,
    language: String,
    rules: Ruleset,
}

#[async_trait]
impl WordLookup for ScrapeLookup {
    async fn lookup(&self, word: &str) -> Result<DictionaryOutcome, DictionaryError> {
        let language = &self.language;
        let url = self.rules.url_for(word);
        let page = match fetch::fetch_page(&self.http, &url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%e, %word, %language, "dictionary page fetch failed");
                return Ok(DictionaryOutcome::NotFound);
            }
        };

        let sentences: Vec<String> = self
            .rules
            .extract(&page)
            .iter()
            .map(|fragment| fragment_to_text(fragment))
            .filter(|sentence| !sentence.is_empty())
            .collect();

        debug!(%word, %language, definitions = sentences.len(), "dictionary lookup complete");
        if sentences.is_empty() {
            Ok(DictionaryOutcome::NotFound)
        } else {
            Ok(DictionaryOutcome::Found { sentences })
        }
    }
}
