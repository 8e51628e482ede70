use std::io;
use std::path::Path;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::DictionaryError;

const WORD_PLACEHOLDER: &str = "{{word}}";
const MAX_LANGUAGE_CODE_LEN: usize = 16;

/// Everything except RFC 3986 unreserved characters.
const WORD_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("'load' must contain the {{{{word}}}} placeholder")]
    MissingPlaceholder,
}

#[derive(Debug, Deserialize)]
struct RawRuleset {
    load: String,
    #[serde(flatten)]
    extraction: RawExtraction,
}

#[derive(Debug, Deserialize)]
struct RawExtraction {
    find: String,
    #[serde(default = "default_replace")]
    replace: String,
    limit: Option<usize>,
    then: Option<Box<RawExtraction>>,
}

fn default_replace() -> String {
    "$0".to_string()
}

/// Compiled scrape instructions for one language.
#[derive(Debug)]
pub struct Ruleset {
    load: String,
    extraction: Extraction,
}

#[derive(Debug)]
struct Extraction {
    pattern: Regex,
    replace: String,
    limit: Option<usize>,
    then: Option<Box<Extraction>>,
}

impl Ruleset {
    pub fn from_json(raw: &str) -> Result<Self, RuleError> {
        let parsed: RawRuleset = serde_json::from_str(raw)?;
        if !parsed.load.contains(WORD_PLACEHOLDER) {
            return Err(RuleError::MissingPlaceholder);
        }
        Ok(Self {
            load: parsed.load,
            extraction: Extraction::compile(parsed.extraction)?,
        })
    }

    pub fn url_for(&self, word: &str) -> String {
        let encoded = utf8_percent_encode(word, WORD_ENCODE_SET).to_string();
        self.load.replace(WORD_PLACEHOLDER, &encoded)
    }

    /// Raw fragments matched in `page`, in document order.
    pub fn extract(&self, page: &str) -> Vec<String> {
        self.extraction.apply(page)
    }
}

impl Extraction {
    fn compile(raw: RawExtraction) -> Result<Self, RuleError> {
        let then = match raw.then {
            Some(next) => Some(Box::new(Self::compile(*next)?)),
            None => None,
        };
        Ok(Self {
            pattern: Regex::new(&raw.find)?,
            replace: raw.replace,
            limit: raw.limit,
            then,
        })
    }

    fn apply(&self, input: &str) -> Vec<String> {
        let mut fragments = Vec::new();
        let limit = self.limit.unwrap_or(usize::MAX);
        for caps in self.pattern.captures_iter(input).take(limit) {
            let mut expanded = String::new();
            caps.expand(&self.replace, &mut expanded);
            match &self.then {
                Some(next) => fragments.extend(next.apply(&expanded)),
                None => fragments.push(expanded),
            }
        }
        fragments
    }
}

/// Language codes double as file names, so only a conservative charset is accepted.
pub fn is_valid_language_code(language: &str) -> bool {
    !language.is_empty()
        && language.len() <= MAX_LANGUAGE_CODE_LEN
        && language
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'))
}

/// Loads `<dir>/<language>.json`, with the code lowercased (`zh-CN` reads `zh-cn.json`).
/// Returns `None` when the language has no rules.
pub async fn load_rules(dir: &Path, language: &str) -> Result<Option<Ruleset>, DictionaryError> {
    let language = language.to_ascii_lowercase();
    if !is_valid_language_code(&language) {
        debug!(%language, "rejected dictionary language code");
        return Ok(None);
    }

    let path = dir.join(format!("{language}.json"));
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(%language, "no dictionary rules for language");
            return Ok(None);
        }
        Err(source) => return Err(DictionaryError::Io { path, source }),
    };

    Ruleset::from_json(&raw)
        .map(Some)
        .map_err(|source| DictionaryError::InvalidRules { path, source })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    /// Fresh directory under the system temp dir; removed on drop.
    pub struct RulesDir(pub PathBuf);

    impl RulesDir {
        pub fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("wordscope-rules-{}", fastrand::u64(..)));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        pub fn write(&self, language: &str, contents: &str) {
            std::fs::write(self.0.join(format!("{language}.json")), contents).unwrap();
        }
    }

    impl Drop for RulesDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }
}
