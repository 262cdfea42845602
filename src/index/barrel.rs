use std::collections::BTreeMap;

use tracing::warn;

use super::types::{Posting, WordId};
use crate::error::Result;
use crate::persistence::{read_json_opt, write_json_atomic, ArtifactPaths};

/// One shard's slice of the inverted index
pub type BarrelMap = BTreeMap<WordId, Vec<Posting>>;

/// The sharded inverted index on disk. `word_id mod num_barrels` selects
/// the shard file; a missing file is an empty shard, never an error.
///
/// Posting lists keep ingestion order. Consumers must treat them as sets
/// keyed by doc id, not as sorted sequences.
#[derive(Clone, Debug)]
pub struct BarrelSet {
    paths: ArtifactPaths,
    num_barrels: u32,
}

impl BarrelSet {
    pub fn new(paths: ArtifactPaths, num_barrels: u32) -> Self {
        Self { paths, num_barrels }
    }

    pub fn num_barrels(&self) -> u32 {
        self.num_barrels
    }

    /// Shard index owning a word
    pub fn shard(&self, word_id: WordId) -> u32 {
        word_id.shard(self.num_barrels)
    }

    /// Load one shard from disk. Missing file reads as empty; an
    /// unparseable file is logged and read as empty rather than failing
    /// the query path.
    pub fn load_shard(&self, shard: u32) -> BarrelMap {
        match read_json_opt::<BarrelMap>(&self.paths.barrel(shard)) {
            Ok(Some(map)) => map,
            Ok(None) => BarrelMap::new(),
            Err(err) => {
                warn!(shard, %err, "unreadable barrel file, serving as empty");
                BarrelMap::new()
            }
        }
    }

    /// Append new postings to a shard and rewrite its file
    pub fn merge_into_shard(&self, shard: u32, new_postings: BarrelMap) -> Result<()> {
        let mut existing = self.load_shard(shard);
        for (word_id, postings) in new_postings {
            debug_assert_eq!(self.shard(word_id), shard);
            existing.entry(word_id).or_default().extend(postings);
        }
        write_json_atomic(&self.paths.barrel(shard), &existing)
    }

    /// Posting list for one word, loading its shard on demand (uncached;
    /// the serving path goes through the cache manager instead)
    pub fn lookup(&self, word_id: WordId) -> Vec<Posting> {
        self.load_shard(self.shard(word_id))
            .remove(&word_id)
            .unwrap_or_default()
    }
}
