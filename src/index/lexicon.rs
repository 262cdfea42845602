use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::WordId;

/// Bijection between tokens and dense word ids.
///
/// Allocation is single-writer: only the ingest path calls `intern`. The
/// next id is rebuilt from the stored map on load, so the persisted form is
/// just the token map.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, WordId>", into = "BTreeMap<String, WordId>")]
pub struct Lexicon {
    entries: BTreeMap<String, WordId>,
    next_id: u32,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Current id for a token, if any
    pub fn lookup(&self, token: &str) -> Option<WordId> {
        self.entries.get(token).copied()
    }

    /// Existing id, or allocate the next dense id for a new token
    pub fn intern(&mut self, token: &str) -> WordId {
        if let Some(id) = self.entries.get(token) {
            return *id;
        }
        let id = WordId(self.next_id);
        self.next_id += 1;
        self.entries.insert(token.to_string(), id);
        id
    }

    /// All known tokens in lexicographic order (trie rebuild input)
    pub fn all_tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, WordId>> for Lexicon {
    fn from(entries: BTreeMap<String, WordId>) -> Self {
        let next_id = entries.values().map(|id| id.0).max().unwrap_or(0) + 1;
        Self { entries, next_id }
    }
}

impl From<Lexicon> for BTreeMap<String, WordId> {
    fn from(lexicon: Lexicon) -> Self {
        lexicon.entries
    }
}
