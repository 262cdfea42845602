use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Minimum token length accepted by the indexing tokenizer
pub const MIN_WORD_LENGTH: usize = 3;

/// Minimum token length surfaced by autocomplete
pub const MIN_TOKEN_LENGTH: usize = 3;

/// Default number of inverted-index shards. Must not change after the
/// first build; every barrel file and the query engine agree on it.
pub const NUM_BARRELS: u32 = 64;

/// Maximum suggestions returned for one autocomplete request
pub const MAX_AUTOCOMPLETE_SUGGESTIONS: usize = 10;

/// Positions further apart than this earn no proximity bonus
pub const MAX_SPAN: u32 = 500;

/// Cosine similarity floor for synonym candidates
pub const SIMILARITY_THRESHOLD: f32 = 0.65;

/// Maximum synonyms joined into one query group
pub const MAX_SYNONYMS: usize = 3;

/// Fixed stop-word list shared by the indexing and query tokenizers
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in",
    "is", "it", "no", "not", "of", "on", "or", "such", "that", "the", "their",
    "then", "there", "these", "they", "this", "to", "was", "will", "with",
    "from", "which", "can", "we", "i", "my", "your", "its", "all", "our",
];

/// Engine configuration. Tunables may be overridden at startup only; the
/// serving path never re-reads them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory for all persistent artifacts
    pub data_dir: PathBuf,
    /// Shard count for the inverted index. Fixed after the first build.
    pub num_barrels: u32,
    /// Pretrained vector file (`<token> <f1> ... <fk>` per line), optional
    pub vectors_file: Option<PathBuf>,
    pub min_word_length: usize,
    pub max_autocomplete_suggestions: usize,
    pub similarity_threshold: f32,
    pub max_synonyms: usize,
    pub max_span: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            num_barrels: NUM_BARRELS,
            vectors_file: None,
            min_word_length: MIN_WORD_LENGTH,
            max_autocomplete_suggestions: MAX_AUTOCOMPLETE_SUGGESTIONS,
            similarity_threshold: SIMILARITY_THRESHOLD,
            max_synonyms: MAX_SYNONYMS,
            max_span: MAX_SPAN,
        }
    }
}

impl EngineConfig {
    /// Create a configuration rooted at the given data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Set the pretrained vector file
    pub fn with_vectors_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectors_file = Some(path.into());
        self
    }

    /// Set the shard count (first build only)
    pub fn with_num_barrels(mut self, num_barrels: u32) -> Self {
        self.num_barrels = num_barrels;
        self
    }

    /// Set the synonym similarity floor
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Directory holding the barrel shard files
    pub fn barrels_dir(&self) -> PathBuf {
        self.data_dir.join("barrels")
    }
}
