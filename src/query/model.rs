use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::category::Category;
use crate::images::RawImageHit;

pub const IMAGE_ENGINE: &str = "bing images";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageHit {
    pub url: String,
    /// `[width, height]`, verbatim from the provider.
    pub size: [String; 2],
    pub meta: ImageMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMeta {
    pub engine: String,
}

impl From<RawImageHit> for ImageHit {
    fn from(raw: RawImageHit) -> Self {
        Self {
            url: raw.media_url,
            size: [raw.width, raw.height],
            meta: ImageMeta {
                engine: IMAGE_ENGINE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordDefinition {
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryResult {
    Translation(String),
    Images(Vec<ImageHit>),
    /// `None` when the source language is unknown or has no dictionary.
    Definitions(Option<Vec<WordDefinition>>),
}

/// Category results in completion order; serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results(Vec<(Category, CategoryResult)>);

impl Results {
    pub fn insert(&mut self, category: Category, result: CategoryResult) {
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = result,
            None => self.0.push((category, result)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, category: Category) -> Option<&CategoryResult> {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, result)| result)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().map(|(c, _)| *c)
    }
}

impl Serialize for Results {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, result) in &self.0 {
            map.serialize_entry(category, result)?;
        }
        map.end()
    }
}

/// Request echo carried by every snapshot and error envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub expression: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub header: Header,
    pub status: Status,
    pub results: Results,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn results_serialize_in_completion_order() {
        let mut results = Results::default();
        results.insert(Category::Images, CategoryResult::Images(vec![]));
        results.insert(
            Category::Translation,
            CategoryResult::Translation("hi".into()),
        );

        let text = serde_json::to_string(&results).unwrap();
        assert_eq!(text, r#"{"images":[],"translation":"hi"}"#);
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut results = Results::default();
        results.insert(Category::Translation, CategoryResult::Translation("a".into()));
        results.insert(Category::Translation, CategoryResult::Translation("b".into()));
        assert_eq!(results.categories().count(), 1);
        assert_eq!(
            results.get(Category::Translation),
            Some(&CategoryResult::Translation("b".into()))
        );
    }

    #[test]
    fn absent_definitions_serialize_as_null() {
        let mut results = Results::default();
        results.insert(Category::Definitions, CategoryResult::Definitions(None));
        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!({"definitions": null})
        );
    }

    #[test]
    fn word_without_sentences_omits_field() {
        let definition = WordDefinition {
            word: "dia".into(),
            sentences: None,
        };
        assert_eq!(serde_json::to_value(&definition).unwrap(), json!({"word": "dia"}));
    }

    #[test]
    fn image_hit_wire_shape() {
        let hit = ImageHit::from(RawImageHit {
            media_url: "http://img".into(),
            width: "194".into(),
            height: "300".into(),
        });
        assert_eq!(
            serde_json::to_value(&hit).unwrap(),
            json!({"url": "http://img", "size": ["194", "300"], "meta": {"engine": "bing images"}})
        );
    }

    #[test]
    fn snapshot_flattens_header() {
        let snapshot = Snapshot {
            header: Header {
                expression: "bom dia".into(),
                source: "pt".into(),
                target: "en".into(),
            },
            status: Status::Success,
            results: Results::default(),
        };
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "expression": "bom dia",
                "source": "pt",
                "target": "en",
                "status": "success",
                "results": {}
            })
        );
    }
}
