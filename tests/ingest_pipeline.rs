use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use papyrus::{EngineConfig, IndexOutcome, RawDocument, SearchEngine};

const NUM_BARRELS: u32 = 8;

fn doc(id: &str, title: &str) -> RawDocument {
    RawDocument {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        authors: Some("A. Author".to_string()),
        categories: Some("cs.IR".to_string()),
        ..Default::default()
    }
}

fn engine(tmp: &TempDir) -> SearchEngine {
    let engine =
        SearchEngine::new(EngineConfig::new(tmp.path()).with_num_barrels(NUM_BARRELS)).unwrap();
    engine.initialize().unwrap();
    engine
}

fn barrel_files(root: &Path) -> BTreeMap<u32, Vec<u8>> {
    (0..NUM_BARRELS)
        .filter_map(|i| {
            fs::read(root.join("barrels").join(i.to_string()))
                .ok()
                .map(|bytes| (i, bytes))
        })
        .collect()
}

#[test]
fn resubmitted_batch_leaves_artifacts_bitwise_identical() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);
    let batch = vec![
        doc("d1", "stochastic gradient descent"),
        doc("d2", "convex optimization methods"),
    ];

    engine.submit_index(batch.clone()).unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    let lexicon_before = fs::read(tmp.path().join("lexicon")).unwrap();
    let docs_before = fs::read(tmp.path().join("docStore")).unwrap();
    let forward_before = fs::read(tmp.path().join("forwardIndex")).unwrap();
    let barrels_before = barrel_files(tmp.path());

    engine.submit_index(batch).unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();
    assert!(matches!(
        engine.last_outcome(),
        Some(IndexOutcome::Completed { indexed_count: 0, .. })
    ));

    assert_eq!(fs::read(tmp.path().join("lexicon")).unwrap(), lexicon_before);
    assert_eq!(fs::read(tmp.path().join("docStore")).unwrap(), docs_before);
    assert_eq!(
        fs::read(tmp.path().join("forwardIndex")).unwrap(),
        forward_before
    );
    assert_eq!(barrel_files(tmp.path()), barrels_before);

    let outcome = engine.search("gradient", 1, 10).unwrap();
    assert_eq!(outcome.total_results, 1);
}

#[test]
fn ingest_then_search_returns_exactly_the_new_docs() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);

    engine
        .submit_index(vec![doc("d1", "background corpus")])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    engine
        .submit_index(vec![
            doc("n1", "zeolite catalysis"),
            doc("n2", "zeolite synthesis"),
        ])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    let outcome = engine.search("zeolite", 1, 10).unwrap();
    let mut ids: Vec<&str> = outcome.results.iter().map(|r| r.doc_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["n1", "n2"]);
}

#[test]
fn every_posting_lives_in_its_owning_barrel() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);

    engine
        .submit_index(vec![
            doc("d1", "quantum error correction codes"),
            doc("d2", "topological quantum computation"),
            doc("d3", "surface code decoders"),
        ])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    for (shard, bytes) in barrel_files(tmp.path()) {
        let map: BTreeMap<String, serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert!(!map.is_empty());
        for key in map.keys() {
            let word_id: u32 = key.parse().unwrap();
            assert_eq!(word_id % NUM_BARRELS, shard);
        }
    }
}

#[test]
fn results_are_enriched_from_the_doc_store() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);

    engine
        .submit_index(vec![doc("d1", "protein folding dynamics")])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    let outcome = engine.search("protein", 1, 10).unwrap();
    let top = &outcome.results[0];
    assert_eq!(top.title, "protein folding dynamics");
    assert_eq!(top.authors, "A. Author");
    assert_eq!(top.categories, "cs.IR");
}

#[test]
fn batch_elements_without_id_are_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);

    engine
        .submit_index(vec![
            RawDocument {
                title: Some("no identifier".to_string()),
                ..Default::default()
            },
            doc("d1", "valid document"),
        ])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    assert!(matches!(
        engine.last_outcome(),
        Some(IndexOutcome::Completed { indexed_count: 1, .. })
    ));
    assert_eq!(engine.search("valid", 1, 10).unwrap().total_results, 1);
}

#[test]
fn status_reflects_ingest_progress() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);

    let before = engine.status();
    assert_eq!(before.status, "ok");
    assert_eq!(before.vocabulary_size, 0);
    let initialized_at = before.last_initialized.unwrap();

    engine
        .submit_index(vec![doc("d1", "turbulence modeling")])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    // turbulence, modeling, author ("A." is too short, "cs"/"ir" too)
    let after = engine.status();
    assert_eq!(after.vocabulary_size, 3);
    assert!(after.doc_store_loaded);
    assert!(after.last_initialized.unwrap() >= initialized_at);
}

#[test]
fn categories_and_authors_are_searchable_fields() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(&tmp);

    engine
        .submit_index(vec![RawDocument {
            id: Some("d1".to_string()),
            title: Some("untitled".to_string()),
            categories: Some("astrophysics cosmology".to_string()),
            authors: Some("Grace Hopper".to_string()),
            submitter: Some("hopper".to_string()),
            ..Default::default()
        }])
        .unwrap();
    engine.wait_for_ingest(Duration::from_secs(10)).unwrap();

    // Categories carry weight 3, authors weight 1
    let by_category = engine.search("cosmology", 1, 10).unwrap();
    assert_eq!(by_category.results[0].score, 3.0);

    let by_author = engine.search("hopper", 1, 10).unwrap();
    assert_eq!(by_author.results[0].doc_id, "d1");
}
