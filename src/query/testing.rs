//! Scripted provider doubles shared by the orchestrator and route tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::Providers;
use crate::dictionary::{Dictionary, DictionaryError, DictionaryOutcome, WordLookup};
use crate::images::{ImageSearch, ImageSearchError, MediaKind, RawImageHit, SearchOptions};
use crate::translate::{TranslateError, TranslationOutcome, Translator};

#[derive(Default)]
pub struct StubTranslator {
    outcomes: Mutex<VecDeque<Result<TranslationOutcome, TranslateError>>>,
    detections: Mutex<VecDeque<Result<String, TranslateError>>>,
    calls: Mutex<Vec<String>>,
}

impl StubTranslator {
    pub fn translating(text: &str, detected: Option<&str>) -> Self {
        Self::with_outcomes(vec![Ok(TranslationOutcome::Translated {
            text: text.into(),
            detected_source: detected.map(str::to_string),
        })])
    }

    pub fn with_outcomes(outcomes: Vec<Result<TranslationOutcome, TranslateError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    pub fn then_detect(self, language: &str) -> Self {
        self.detections
            .lock()
            .unwrap()
            .push_back(Ok(language.to_string()));
        self
    }

    pub fn captured_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationOutcome, TranslateError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("translate({text}|{source}|{target})"));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TranslateError::ApiKeyNotSet))
    }

    async fn detect(&self, text: &str) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push(format!("detect({text})"));
        self.detections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TranslateError::ApiKeyNotSet))
    }
}

#[derive(Default)]
pub struct StubImages {
    responses: Mutex<VecDeque<Result<Vec<RawImageHit>, ImageSearchError>>>,
    queries: Mutex<Vec<(String, SearchOptions)>>,
}

impl StubImages {
    pub fn with_hits(hits: Vec<(&str, &str, &str)>) -> Self {
        let hits = hits
            .into_iter()
            .map(|(url, width, height)| RawImageHit {
                media_url: url.into(),
                width: width.into(),
                height: height.into(),
            })
            .collect();
        Self {
            responses: Mutex::new(VecDeque::from([Ok(hits)])),
            ..Self::default()
        }
    }

    pub fn failing(error: ImageSearchError) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(error)])),
            ..Self::default()
        }
    }

    pub fn captured_queries(&self) -> Vec<(String, SearchOptions)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for StubImages {
    async fn search(
        &self,
        _kind: MediaKind,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<RawImageHit>, ImageSearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), options.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ImageSearchError::ApiKeyNotSet))
    }
}

/// In-memory dictionary: language -> word -> sentences.
#[derive(Default)]
pub struct StubDictionary {
    entries: HashMap<String, HashMap<String, Vec<String>>>,
    broken: bool,
    opens: Mutex<Vec<String>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl StubDictionary {
    pub fn with_language(mut self, language: &str) -> Self {
        self.entries.entry(language.into()).or_default();
        self
    }

    pub fn with_entry(mut self, language: &str, word: &str, sentences: &[&str]) -> Self {
        self.entries.entry(language.into()).or_default().insert(
            word.into(),
            sentences.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn captured_opens(&self) -> Vec<String> {
        self.opens.lock().unwrap().clone()
    }

    pub fn captured_lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dictionary for StubDictionary {
    async fn open(&self, language: &str) -> Result<Option<Box<dyn WordLookup>>, DictionaryError> {
        self.opens.lock().unwrap().push(language.to_string());
        if self.broken {
            return Err(DictionaryError::Io {
                path: "stub.json".into(),
                source: std::io::Error::other("disk on fire"),
            });
        }
        Ok(self.entries.get(language).map(|words| {
            Box::new(StubLookup {
                language: language.to_string(),
                words: words.clone(),
                lookups: self.lookups.clone(),
            }) as Box<dyn WordLookup>
        }))
    }
}

struct StubLookup {
    language: String,
    words: HashMap<String, Vec<String>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl WordLookup for StubLookup {
    async fn lookup(&self, word: &str) -> Result<DictionaryOutcome, DictionaryError> {
        self.lookups
            .lock()
            .unwrap()
            .push(format!("{}:{word}", self.language));
        Ok(self
            .words
            .get(word)
            .map_or(DictionaryOutcome::NotFound, |sentences| {
                DictionaryOutcome::Found {
                    sentences: sentences.clone(),
                }
            }))
    }
}

pub fn providers(
    translator: &Arc<StubTranslator>,
    images: &Arc<StubImages>,
    dictionary: &Arc<StubDictionary>,
) -> Providers {
    Providers {
        translator: translator.clone(),
        images: images.clone(),
        dictionary: dictionary.clone(),
    }
}
