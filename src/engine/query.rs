//! The ranked-search pipeline: tokenize, expand into synonym groups,
//! intersect per-group candidates, score, paginate.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

use ordered_float::OrderedFloat;

use crate::config::EngineConfig;
use crate::engine::cache::CacheManager;
use crate::engine::scoring::{proximity_bonus, term_score};
use crate::error::Result;
use crate::index::{Posting, WordId};
use crate::models::{DocId, MatchType, SearchOutcome, SearchResultItem};
use crate::tokenizer::Tokenizer;

/// One query token and the words that may satisfy it. The token itself is
/// the only exact word; the rest are synonyms scored at half weight.
struct Group {
    words: Vec<(WordId, bool)>,
}

struct Candidate {
    posting: Posting,
    is_exact: bool,
}

pub fn run_search(
    cache: &CacheManager,
    tokenizer: &Tokenizer,
    config: &EngineConfig,
    query: &str,
    page: usize,
    limit: usize,
) -> Result<SearchOutcome> {
    let start = Instant::now();
    let page = page.max(1);
    let limit = limit.max(1);

    let snapshot = cache.current()?;

    // Stage 1: tokenize the query
    let tokens = tokenizer.terms(query);
    if tokens.is_empty() {
        return Ok(SearchOutcome::empty(page, limit, elapsed_ms(start)));
    }
    let empty = |start: Instant| SearchOutcome {
        results: Vec::new(),
        took_ms: elapsed_ms(start),
        tokens: tokens.clone(),
        total_results: 0,
        has_more: false,
        page,
        limit,
    };

    // Stage 2: expand each token into a disjunctive group, exact word first
    let groups: Vec<Group> = tokens
        .iter()
        .map(|token| {
            let mut words = Vec::new();
            if let Some(id) = snapshot.lexicon.lookup(token) {
                words.push((id, true));
            }
            for synonym in snapshot.semantic.find_synonyms(token) {
                if let Some(id) = snapshot.lexicon.lookup(&synonym) {
                    if !words.iter().any(|(existing, _)| *existing == id) {
                        words.push((id, false));
                    }
                }
            }
            Group { words }
        })
        .collect();

    // Stage 3: load every shard the groups touch
    let all_words: Vec<WordId> = groups
        .iter()
        .flat_map(|group| group.words.iter().map(|(id, _)| *id))
        .collect();
    cache.ensure_shards(&all_words);

    // Stage 4: per-group candidate maps, preferring exact-match postings
    let mut maps: Vec<HashMap<DocId, Candidate>> = Vec::with_capacity(groups.len());
    for group in &groups {
        let mut map: HashMap<DocId, Candidate> = HashMap::new();
        for (word_id, is_exact) in &group.words {
            for posting in cache.postings(*word_id) {
                match map.entry(posting.doc_id.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(Candidate {
                            posting,
                            is_exact: *is_exact,
                        });
                    }
                    Entry::Occupied(mut slot) => {
                        if *is_exact && !slot.get().is_exact {
                            slot.insert(Candidate {
                                posting,
                                is_exact: true,
                            });
                        }
                    }
                }
            }
        }
        maps.push(map);
    }

    // Stage 5: conjunction, smallest group first to keep intermediates small
    maps.sort_by_key(HashMap::len);
    if maps.first().map_or(true, HashMap::is_empty) {
        return Ok(empty(start));
    }

    let mut iter = maps.into_iter();
    let mut surviving: HashMap<DocId, Vec<Candidate>> = iter
        .next()
        .expect("at least one group")
        .into_iter()
        .map(|(doc_id, candidate)| (doc_id, vec![candidate]))
        .collect();

    for mut map in iter {
        surviving.retain(|doc_id, candidates| match map.remove(doc_id) {
            Some(candidate) => {
                candidates.push(candidate);
                true
            }
            None => false,
        });
        if surviving.is_empty() {
            return Ok(empty(start));
        }
    }

    // Stage 6: score the survivors
    struct Scored {
        doc_id: DocId,
        score: f32,
        word_count: usize,
        match_type: MatchType,
    }

    let mut scored: Vec<Scored> = Vec::with_capacity(surviving.len());
    for (doc_id, candidates) in surviving {
        if !snapshot.docs.contains(&doc_id) {
            continue;
        }

        let mut total: f32 = candidates
            .iter()
            .map(|c| term_score(&c.posting.hits, c.is_exact))
            .sum();
        if candidates.len() > 1 {
            let positions: Vec<u32> = candidates
                .iter()
                .flat_map(|c| c.posting.hits.iter().map(|hit| hit.pos))
                .collect();
            total += proximity_bonus(&positions, config.max_span);
        }

        let match_type = if candidates.iter().all(|c| c.is_exact) {
            MatchType::Exact
        } else {
            MatchType::Semantic
        };

        scored.push(Scored {
            doc_id,
            score: total,
            word_count: candidates.len(),
            match_type,
        });
    }

    // Stage 7: deterministic order, pagination, metadata enrichment
    scored.sort_by(|a, b| {
        OrderedFloat(b.score)
            .cmp(&OrderedFloat(a.score))
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });

    let total_results = scored.len();
    let (window_start, window_end) = page_window(total_results, page, limit);
    let results = scored[window_start..window_end]
        .iter()
        .map(|s| {
            let record = snapshot.docs.get(&s.doc_id).cloned().unwrap_or_default();
            SearchResultItem {
                doc_id: s.doc_id.clone(),
                score: s.score,
                word_count: s.word_count,
                match_type: s.match_type,
                title: record.title,
                authors: record.authors,
                categories: record.categories,
            }
        })
        .collect();

    Ok(SearchOutcome {
        results,
        took_ms: elapsed_ms(start),
        tokens,
        total_results,
        has_more: window_end < total_results,
        page,
        limit,
    })
}

fn page_window(total: usize, page: usize, limit: usize) -> (usize, usize) {
    let start = (page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);
    (start, end)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(10, 1, 4), (0, 4));
        assert_eq!(page_window(10, 3, 4), (8, 10));
        assert_eq!(page_window(10, 4, 4), (10, 10));
        assert_eq!(page_window(0, 1, 10), (0, 0));
    }
}
