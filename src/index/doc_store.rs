use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{DocId, DocRecord};

/// Document id to metadata map. Writes are append-only from the ingest
/// path; `contains` is the canonical idempotence check.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentStore {
    records: BTreeMap<DocId, DocRecord>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, doc_id: DocId, record: DocRecord) {
        self.records.insert(doc_id, record);
    }

    pub fn get(&self, doc_id: &str) -> Option<&DocRecord> {
        self.records.get(doc_id)
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.records.contains_key(doc_id)
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = &DocId> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
