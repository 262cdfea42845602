use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::DocId;

/// How a result matched the query: through the query's own terms only, or
/// with at least one synonym substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Semantic,
}

/// One ranked search result, enriched with document-store metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub doc_id: DocId,
    pub score: f32,
    /// Number of query groups the document satisfied
    pub word_count: usize,
    pub match_type: MatchType,
    pub title: String,
    pub authors: String,
    pub categories: String,
}

/// One page of search results with timing information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResultItem>,
    pub took_ms: u64,
    /// Query tokens after tokenization, in query order
    pub tokens: Vec<String>,
    pub total_results: usize,
    pub has_more: bool,
    pub page: usize,
    pub limit: usize,
}

impl SearchOutcome {
    /// The empty page returned for queries with no recognized words
    pub fn empty(page: usize, limit: usize, took_ms: u64) -> Self {
        Self {
            results: Vec::new(),
            took_ms,
            tokens: Vec::new(),
            total_results: 0,
            has_more: false,
            page,
            limit,
        }
    }
}

/// Autocomplete suggestions for a query being typed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AutocompleteOutcome {
    pub suggestions: Vec<String>,
}

/// Snapshot of engine health for the status surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineStatus {
    pub status: String,
    pub trie_loaded: bool,
    pub vocabulary_loaded: bool,
    pub vectors_loaded: bool,
    pub cached_barrels: usize,
    pub vocabulary_size: usize,
    pub doc_store_loaded: bool,
    pub last_initialized: Option<DateTime<Utc>>,
}
