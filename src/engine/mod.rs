//! The serving facade: query, autocomplete, status and ingest submission.

pub mod cache;
pub mod query;
pub mod scoring;

pub use cache::{CacheManager, Snapshot};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{PapyrusError, Result};
use crate::indexer::{spawn_indexer, IndexJob, IndexOutcome};
use crate::models::{AutocompleteOutcome, EngineStatus, RawDocument, SearchOutcome};
use crate::tokenizer::Tokenizer;

/// The search engine. Owns the serving caches, the query pipeline and the
/// background ingest worker.
///
/// Ingest jobs are accepted immediately and run strictly serially on the
/// worker; the serving side keeps answering from its current snapshot
/// until the post-ingest reload lands.
pub struct SearchEngine {
    config: EngineConfig,
    tokenizer: Tokenizer,
    cache: Arc<CacheManager>,
    job_tx: Option<Sender<IndexJob>>,
    submitted: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,
    ingest_cv: Arc<(Mutex<()>, Condvar)>,
    last_outcome: Arc<Mutex<Option<IndexOutcome>>>,
    worker: Option<thread::JoinHandle<()>>,
    supervisor: Option<thread::JoinHandle<()>>,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).map_err(|err| {
            PapyrusError::Config(format!(
                "cannot create data dir {}: {}",
                config.data_dir.display(),
                err
            ))
        })?;

        let cache = Arc::new(CacheManager::new(config.clone()));
        let (job_tx, job_rx) = unbounded::<IndexJob>();
        let (outcome_tx, outcome_rx) = unbounded::<IndexOutcome>();

        let worker = spawn_indexer(config.clone(), job_rx, outcome_tx);

        let submitted = Arc::new(AtomicU64::new(0));
        let completed = Arc::new(AtomicU64::new(0));
        let ingest_cv = Arc::new((Mutex::new(()), Condvar::new()));
        let last_outcome = Arc::new(Mutex::new(None));

        let supervisor = spawn_supervisor(
            outcome_rx,
            Arc::clone(&cache),
            Arc::clone(&submitted),
            Arc::clone(&completed),
            Arc::clone(&ingest_cv),
            Arc::clone(&last_outcome),
        );

        Ok(Self {
            tokenizer: Tokenizer::new(config.min_word_length),
            config,
            cache,
            job_tx: Some(job_tx),
            submitted,
            completed,
            ingest_cv,
            last_outcome,
            worker: Some(worker),
            supervisor: Some(supervisor),
        })
    }

    /// First-time cache load. Must complete before the query surface is
    /// usable.
    pub fn initialize(&self) -> Result<()> {
        self.cache.initialize()
    }

    /// Ranked multi-term search with semantic expansion
    pub fn search(&self, query: &str, page: usize, limit: usize) -> Result<SearchOutcome> {
        query::run_search(&self.cache, &self.tokenizer, &self.config, query, page, limit)
    }

    /// Prefix suggestions for a query being typed
    pub fn autocomplete(&self, query: &str) -> Result<AutocompleteOutcome> {
        let snapshot = self.cache.current()?;
        Ok(AutocompleteOutcome {
            suggestions: snapshot
                .trie
                .suggest(query, self.config.max_autocomplete_suggestions),
        })
    }

    pub fn status(&self) -> EngineStatus {
        self.cache.status()
    }

    /// Queue a batch for background ingestion. Returns as soon as the job
    /// is accepted; completion is observable through `status()` and
    /// `wait_for_ingest`.
    pub fn submit_index(&self, batch: Vec<RawDocument>) -> Result<()> {
        let tx = self
            .job_tx
            .as_ref()
            .ok_or_else(|| PapyrusError::WorkerFailure("indexer shut down".to_string()))?;

        self.submitted.fetch_add(1, Ordering::SeqCst);
        if tx.send(IndexJob { batch }).is_err() {
            self.submitted.fetch_sub(1, Ordering::SeqCst);
            return Err(PapyrusError::WorkerFailure(
                "indexer worker unavailable".to_string(),
            ));
        }
        Ok(())
    }

    /// Accept a raw JSON payload from the transport layer. Anything other
    /// than an array is rejected; array elements deserialize leniently and
    /// invalid ones are dropped by the worker.
    pub fn submit_index_json(&self, payload: serde_json::Value) -> Result<()> {
        if !payload.is_array() {
            return Err(PapyrusError::BadInput(
                "index batch must be a JSON array".to_string(),
            ));
        }
        let batch: Vec<RawDocument> = serde_json::from_value(payload)?;
        self.submit_index(batch)
    }

    /// Block until every job submitted so far has completed (successfully
    /// or not) and its reload, if any, has landed
    pub fn wait_for_ingest(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let (lock, cv) = &*self.ingest_cv;
        let mut guard = lock.lock();
        while self.completed.load(Ordering::SeqCst) < self.submitted.load(Ordering::SeqCst) {
            if Instant::now() >= deadline {
                return Err(PapyrusError::Internal(
                    "timed out waiting for ingest".to_string(),
                ));
            }
            cv.wait_until(&mut guard, deadline);
        }
        Ok(())
    }

    /// Outcome of the most recently completed ingest job
    pub fn last_outcome(&self) -> Option<IndexOutcome> {
        self.last_outcome.lock().clone()
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        // Closing the job channel lets the worker drain and exit; the
        // supervisor follows once the outcome channel closes.
        self.job_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        if let Some(supervisor) = self.supervisor.take() {
            let _ = supervisor.join();
        }
    }
}

fn spawn_supervisor(
    outcome_rx: Receiver<IndexOutcome>,
    cache: Arc<CacheManager>,
    submitted: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,
    ingest_cv: Arc<(Mutex<()>, Condvar)>,
    last_outcome: Arc<Mutex<Option<IndexOutcome>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(outcome) = outcome_rx.recv() {
            match &outcome {
                IndexOutcome::Completed { indexed_count, .. } => {
                    if let Err(err) = cache.reload() {
                        warn!(%err, "post-ingest reload failed, serving stale caches");
                    } else {
                        info!(
                            indexed_count = *indexed_count,
                            "serving caches refreshed after ingest"
                        );
                    }
                }
                IndexOutcome::Failed { message } => {
                    warn!(%message, "ingest job failed, caches untouched");
                }
            }

            *last_outcome.lock() = Some(outcome);
            completed.fetch_add(1, Ordering::SeqCst);
            let (lock, cv) = &*ingest_cv;
            let _guard = lock.lock();
            cv.notify_all();
        }

        // The worker is gone. If jobs are still pending the worker died
        // abnormally; surface that and unblock any waiters.
        let pending = submitted.load(Ordering::SeqCst) - completed.load(Ordering::SeqCst);
        if pending > 0 {
            *last_outcome.lock() = Some(IndexOutcome::Failed {
                message: "indexer worker exited before finishing".to_string(),
            });
            completed.store(submitted.load(Ordering::SeqCst), Ordering::SeqCst);
            let (lock, cv) = &*ingest_cv;
            let _guard = lock.lock();
            cv.notify_all();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn engine(tmp: &TempDir) -> SearchEngine {
        SearchEngine::new(EngineConfig::new(tmp.path()).with_num_barrels(8)).unwrap()
    }

    #[test]
    fn test_query_before_initialize_fails() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&tmp);
        assert!(matches!(
            engine.search("anything", 1, 10),
            Err(PapyrusError::NotInitialized)
        ));
        assert!(matches!(
            engine.autocomplete("any"),
            Err(PapyrusError::NotInitialized)
        ));
    }

    #[test]
    fn test_submit_index_json_rejects_non_array() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&tmp);
        assert!(matches!(
            engine.submit_index_json(json!({"id": "d1"})),
            Err(PapyrusError::BadInput(_))
        ));
    }

    #[test]
    fn test_ingest_then_search_round_trip() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&tmp);
        engine.initialize().unwrap();

        engine
            .submit_index_json(json!([
                {"id": "d1", "title": "neural networks", "abstract": "graph theory"}
            ]))
            .unwrap();
        engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

        assert!(matches!(
            engine.last_outcome(),
            Some(IndexOutcome::Completed { indexed_count: 1, .. })
        ));

        let outcome = engine.search("neural", 1, 10).unwrap();
        assert_eq!(outcome.total_results, 1);
        assert_eq!(outcome.results[0].doc_id, "d1");
    }

    #[test]
    fn test_serial_jobs_queue() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&tmp);
        engine.initialize().unwrap();

        for i in 0..3 {
            engine
                .submit_index(vec![RawDocument {
                    id: Some(format!("d{}", i)),
                    title: Some("shared title words".to_string()),
                    ..Default::default()
                }])
                .unwrap();
        }
        engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

        let outcome = engine.search("shared", 1, 10).unwrap();
        assert_eq!(outcome.total_results, 3);
    }
}
