use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{Hit, WordId};
use crate::models::DocId;

/// Per-document map from word id to the ordered hits of that word
pub type ForwardEntry = BTreeMap<WordId, Vec<Hit>>;

/// Forward index: document id to its forward entry. Input to barrel
/// rebuilds; written once per document during ingest.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForwardIndex {
    entries: BTreeMap<DocId, ForwardEntry>,
}

impl ForwardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, doc_id: DocId, entry: ForwardEntry) {
        self.entries.insert(doc_id, entry);
    }

    pub fn get(&self, doc_id: &str) -> Option<&ForwardEntry> {
        self.entries.get(doc_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
