//! Background incremental indexer.
//!
//! Jobs queue on a channel and run strictly serially on one worker thread.
//! The worker operates on its own working copies loaded from disk and
//! never touches the serving caches; it reports a tagged outcome and the
//! supervisor decides whether to reload.

use std::collections::HashMap;
use std::thread;

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{
    BarrelMap, BarrelSet, DocumentStore, FieldCode, ForwardEntry, ForwardIndex, Hit, Lexicon,
    Posting,
};
use crate::models::{DocRecord, RawDocument};
use crate::persistence::{read_json_opt, write_json_atomic, ArtifactPaths};
use crate::tokenizer::Tokenizer;

/// A batch of new documents to ingest
#[derive(Clone, Debug)]
pub struct IndexJob {
    pub batch: Vec<RawDocument>,
}

/// Tagged result posted back to the supervisor when a job finishes
#[derive(Clone, Debug)]
pub enum IndexOutcome {
    Completed { indexed_count: usize, message: String },
    Failed { message: String },
}

/// Spawn the worker thread. It drains the job channel until every sender
/// is dropped, posting one outcome per job.
pub fn spawn_indexer(
    config: EngineConfig,
    rx: Receiver<IndexJob>,
    outcome_tx: Sender<IndexOutcome>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let tokenizer = Tokenizer::new(config.min_word_length);
        while let Ok(job) = rx.recv() {
            let outcome = match ingest_batch(&config, &tokenizer, job.batch) {
                Ok(indexed_count) => {
                    info!(indexed_count, "ingest batch committed");
                    IndexOutcome::Completed {
                        indexed_count,
                        message: format!("indexed {} documents", indexed_count),
                    }
                }
                Err(err) => {
                    warn!(%err, "ingest batch failed");
                    IndexOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };
            if outcome_tx.send(outcome).is_err() {
                return;
            }
        }
    })
}

/// Run one batch against the on-disk indices. Returns the number of
/// documents committed.
///
/// Documents without an id, or whose id is already stored, are skipped;
/// idempotent resubmission of a batch is a no-op. Everything the batch
/// touches is rewritten through write-temp-rename, shards first, then the
/// lexicon, document store and forward index.
pub fn ingest_batch(
    config: &EngineConfig,
    tokenizer: &Tokenizer,
    batch: Vec<RawDocument>,
) -> Result<usize> {
    let paths = ArtifactPaths::new(&config.data_dir);
    let barrels = BarrelSet::new(paths.clone(), config.num_barrels);

    let mut lexicon: Lexicon = read_json_opt(&paths.lexicon())?.unwrap_or_default();
    let mut docs: DocumentStore = read_json_opt(&paths.doc_store())?.unwrap_or_default();
    let mut forward: ForwardIndex = read_json_opt(&paths.forward_index())?.unwrap_or_default();

    let mut pending: HashMap<u32, BarrelMap> = HashMap::new();
    let mut indexed_count = 0usize;

    for raw in batch {
        let Some(doc_id) = raw.id.clone().filter(|id| !id.is_empty()) else {
            debug!("dropping batch element without id");
            continue;
        };
        if docs.contains(&doc_id) {
            debug!(%doc_id, "dropping already indexed document");
            continue;
        }

        let entry = build_forward_entry(tokenizer, &mut lexicon, &raw);
        for (word_id, hits) in &entry {
            let shard = barrels.shard(*word_id);
            pending
                .entry(shard)
                .or_default()
                .entry(*word_id)
                .or_default()
                .push(Posting::new(doc_id.clone(), hits.clone()));
        }

        docs.put(doc_id.clone(), DocRecord::from_raw(&raw));
        forward.put(doc_id, entry);
        indexed_count += 1;
    }

    if indexed_count == 0 {
        return Ok(0);
    }

    for (shard, new_postings) in pending {
        barrels.merge_into_shard(shard, new_postings)?;
    }

    write_json_atomic(&paths.lexicon(), &lexicon)?;
    write_json_atomic(&paths.doc_store(), &docs)?;
    write_json_atomic(&paths.forward_index(), &forward)?;

    Ok(indexed_count)
}

/// Tokenize the document's fields in canonical order with one running
/// position counter and group the hits per word
fn build_forward_entry(
    tokenizer: &Tokenizer,
    lexicon: &mut Lexicon,
    raw: &RawDocument,
) -> ForwardEntry {
    let mut entry = ForwardEntry::new();
    let mut position = 0u32;

    let fields = raw.canonical_fields();
    for (text, field) in fields.iter().zip(FieldCode::CANONICAL_ORDER) {
        for token in tokenizer.tokenize_from(text, &mut position) {
            let word_id = lexicon.intern(&token.text);
            entry
                .entry(word_id)
                .or_default()
                .push(Hit::new(token.position, field));
        }
    }
    entry
}
