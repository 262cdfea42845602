//! Small-scale search engine for a scholarly-article corpus.
//!
//! The crate is organized around four subsystems:
//!
//! - **`index`**: tokenized documents become a lexicon (token to dense word
//!   id), per-document forward entries, and a barrel-partitioned inverted
//!   index (`word_id mod num_barrels` selects the shard file).
//! - **`engine`**: the query pipeline (Boolean conjunction over synonym
//!   groups, field-weighted scoring with a proximity bonus, pagination)
//!   plus the cache manager that holds the serving snapshot.
//! - **`semantic`**: pretrained word vectors filtered by the lexicon;
//!   cosine-similarity synonym sets expand each query token into a
//!   disjunctive group.
//! - **`indexer`**: a background worker that ingests new document batches
//!   against its own working copies of the indices and signals the serving
//!   side to atomically reload.
//!
//! HTTP routing, CLI and UI are external collaborators; they consume
//! [`SearchEngine`] directly.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod models;
pub mod persistence;
pub mod semantic;
pub mod tokenizer;
pub mod trie;

pub use config::EngineConfig;
pub use engine::{CacheManager, SearchEngine};
pub use error::{PapyrusError, Result};
pub use index::{BarrelSet, FieldCode, Hit, Lexicon, Posting, WordId};
pub use indexer::IndexOutcome;
pub use models::*;
pub use semantic::SemanticModel;
pub use tokenizer::Tokenizer;
pub use trie::Trie;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
