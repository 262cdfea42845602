use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::{PapyrusError, Result};
use crate::index::{BarrelMap, BarrelSet, DocumentStore, Lexicon, Posting, WordId};
use crate::models::EngineStatus;
use crate::persistence::{read_json_opt, ArtifactPaths};
use crate::semantic::SemanticModel;
use crate::trie::Trie;

/// A frozen view of the serving state. Every in-flight query holds the
/// snapshot it started with; reload installs a new one atomically.
pub struct Snapshot {
    pub lexicon: Lexicon,
    pub docs: DocumentStore,
    pub trie: Trie,
    pub semantic: Arc<SemanticModel>,
}

/// Owns the in-memory serving state: the current snapshot plus a lazy
/// cache of loaded barrel shards.
///
/// The background indexer never touches this; it writes files and the
/// supervisor calls [`CacheManager::reload`] to swap the new state in.
pub struct CacheManager {
    config: EngineConfig,
    paths: ArtifactPaths,
    barrels: BarrelSet,
    snapshot: ArcSwapOption<Snapshot>,
    shard_cache: DashMap<u32, Arc<BarrelMap>>,
    last_initialized: RwLock<Option<DateTime<Utc>>>,
}

impl CacheManager {
    pub fn new(config: EngineConfig) -> Self {
        let paths = ArtifactPaths::new(&config.data_dir);
        let barrels = BarrelSet::new(paths.clone(), config.num_barrels);
        Self {
            config,
            paths,
            barrels,
            snapshot: ArcSwapOption::empty(),
            shard_cache: DashMap::new(),
            last_initialized: RwLock::new(None),
        }
    }

    /// First-time load: lexicon and document store from persistence, trie
    /// from the lexicon keys, vectors filtered by the lexicon. Missing
    /// artifacts mean a fresh index; unreadable ones are fatal.
    pub fn initialize(&self) -> Result<()> {
        let lexicon = self.load_lexicon()?;
        let docs = self.load_doc_store()?;
        let trie = Trie::from_tokens(lexicon.all_tokens());

        let semantic = match &self.config.vectors_file {
            Some(path) => Arc::new(
                SemanticModel::load(
                    path,
                    &lexicon,
                    self.config.similarity_threshold,
                    self.config.max_synonyms,
                )
                .map_err(|err| {
                    PapyrusError::Config(format!(
                        "unreadable vector file {}: {}",
                        path.display(),
                        err
                    ))
                })?,
            ),
            None => Arc::new(SemanticModel::empty()),
        };

        info!(
            vocabulary = lexicon.len(),
            documents = docs.len(),
            "caches initialized"
        );
        self.install(lexicon, docs, trie, semantic);
        Ok(())
    }

    /// Re-read lexicon and document store, rebuild the trie, and swap the
    /// snapshot. The vector table is retained: newly interned words have
    /// no pretrained vectors. The shard cache is dropped wholesale so
    /// queries reload merged postings on demand.
    pub fn reload(&self) -> Result<()> {
        let previous = self
            .snapshot
            .load_full()
            .ok_or(PapyrusError::NotInitialized)?;

        let lexicon = self.load_lexicon()?;
        let docs = self.load_doc_store()?;
        let trie = Trie::from_tokens(lexicon.all_tokens());
        let semantic = Arc::clone(&previous.semantic);

        self.shard_cache.clear();
        info!(
            vocabulary = lexicon.len(),
            documents = docs.len(),
            "caches reloaded"
        );
        self.install(lexicon, docs, trie, semantic);
        Ok(())
    }

    /// Drop specific shards from the cache so the next lookup re-reads
    /// them from disk
    pub fn invalidate_shards(&self, shards: &[u32]) {
        for shard in shards {
            self.shard_cache.remove(shard);
        }
    }

    /// The current snapshot, or `NotInitialized` before the first
    /// `initialize`
    pub fn current(&self) -> Result<Arc<Snapshot>> {
        self.snapshot
            .load_full()
            .ok_or(PapyrusError::NotInitialized)
    }

    /// Load every shard needed for the given words into the cache
    pub fn ensure_shards(&self, word_ids: &[WordId]) {
        let shards: HashSet<u32> = word_ids.iter().map(|id| self.barrels.shard(*id)).collect();
        for shard in shards {
            self.shard(shard);
        }
    }

    /// Posting list for one word via the shard cache
    pub fn postings(&self, word_id: WordId) -> Vec<Posting> {
        self.shard(self.barrels.shard(word_id))
            .get(&word_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn status(&self) -> EngineStatus {
        match self.snapshot.load_full() {
            Some(snapshot) => EngineStatus {
                status: "ok".to_string(),
                trie_loaded: true,
                vocabulary_loaded: true,
                vectors_loaded: !snapshot.semantic.is_empty(),
                cached_barrels: self.shard_cache.len(),
                vocabulary_size: snapshot.lexicon.len(),
                doc_store_loaded: true,
                last_initialized: *self.last_initialized.read(),
            },
            None => EngineStatus {
                status: "uninitialized".to_string(),
                trie_loaded: false,
                vocabulary_loaded: false,
                vectors_loaded: false,
                cached_barrels: 0,
                vocabulary_size: 0,
                doc_store_loaded: false,
                last_initialized: None,
            },
        }
    }

    fn shard(&self, shard: u32) -> Arc<BarrelMap> {
        self.shard_cache
            .entry(shard)
            .or_insert_with(|| Arc::new(self.barrels.load_shard(shard)))
            .clone()
    }

    fn install(
        &self,
        lexicon: Lexicon,
        docs: DocumentStore,
        trie: Trie,
        semantic: Arc<SemanticModel>,
    ) {
        self.snapshot.store(Some(Arc::new(Snapshot {
            lexicon,
            docs,
            trie,
            semantic,
        })));
        *self.last_initialized.write() = Some(Utc::now());
    }

    fn load_lexicon(&self) -> Result<Lexicon> {
        read_json_opt(&self.paths.lexicon())
            .map(Option::unwrap_or_default)
            .map_err(|err| PapyrusError::Config(format!("unreadable lexicon: {}", err)))
    }

    fn load_doc_store(&self) -> Result<DocumentStore> {
        read_json_opt(&self.paths.doc_store())
            .map(Option::unwrap_or_default)
            .map_err(|err| PapyrusError::Config(format!("unreadable docStore: {}", err)))
    }
}
