use serde::{Deserialize, Serialize};

/// External document identifier (arXiv-style string id)
pub type DocId = String;

/// One element of the canonical batch input. Every field is optional at the
/// wire level; elements without an id are dropped inside the worker.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub submitter: Option<String>,
}

impl RawDocument {
    /// Field values in canonical order: title, abstract, categories,
    /// authors, submitter. Position counting depends on this order.
    pub fn canonical_fields(&self) -> [&str; 5] {
        [
            self.title.as_deref().unwrap_or(""),
            self.abstract_text.as_deref().unwrap_or(""),
            self.categories.as_deref().unwrap_or(""),
            self.authors.as_deref().unwrap_or(""),
            self.submitter.as_deref().unwrap_or(""),
        ]
    }
}

/// Lightweight metadata kept in the document store. Written once per
/// document, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocRecord {
    pub title: String,
    pub authors: String,
    pub categories: String,
}

impl DocRecord {
    pub fn from_raw(raw: &RawDocument) -> Self {
        Self {
            title: raw.title.clone().unwrap_or_default(),
            authors: raw.authors.clone().unwrap_or_default(),
            categories: raw.categories.clone().unwrap_or_default(),
        }
    }
}
