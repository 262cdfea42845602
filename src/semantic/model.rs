use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ordered_float::OrderedFloat;
use tracing::{info, warn};

use crate::config::{MAX_SYNONYMS, SIMILARITY_THRESHOLD};
use crate::error::Result;
use crate::index::Lexicon;

/// Compute cosine similarity between two vectors, clamped to [0, 1]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

struct VectorEntry {
    token: String,
    vector: Vec<f32>,
}

/// Word-vector table restricted to the corpus lexicon.
///
/// Loaded once at startup from a `<token> <f1> ... <fk>` text file; the
/// dimension is inferred from the first accepted row. Synonym lookup is a
/// linear cosine scan, acceptable because the table is the intersection
/// with the lexicon.
pub struct SemanticModel {
    dims: usize,
    entries: Vec<VectorEntry>,
    by_token: HashMap<String, usize>,
    threshold: f32,
    max_synonyms: usize,
}

impl SemanticModel {
    /// A model with no vectors; every synonym lookup returns empty
    pub fn empty() -> Self {
        Self {
            dims: 0,
            entries: Vec::new(),
            by_token: HashMap::new(),
            threshold: SIMILARITY_THRESHOLD,
            max_synonyms: MAX_SYNONYMS,
        }
    }

    /// Stream the vector file line by line, keeping only rows whose token
    /// is in the lexicon. Rows that fail to parse or disagree with the
    /// inferred dimension are skipped.
    pub fn load(
        path: &Path,
        lexicon: &Lexicon,
        threshold: f32,
        max_synonyms: usize,
    ) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut model = Self {
            dims: 0,
            entries: Vec::new(),
            by_token: HashMap::new(),
            threshold,
            max_synonyms,
        };

        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(token) = parts.next() else {
                continue;
            };
            if lexicon.lookup(token).is_none() || model.by_token.contains_key(token) {
                continue;
            }

            let vector: Vec<f32> = match parts.map(str::parse).collect() {
                Ok(v) => v,
                Err(_) => {
                    warn!(token, "skipping unparseable vector row");
                    continue;
                }
            };
            if vector.is_empty() {
                continue;
            }

            if model.dims == 0 {
                model.dims = vector.len();
            } else if vector.len() != model.dims {
                warn!(
                    token,
                    expected = model.dims,
                    actual = vector.len(),
                    "skipping vector row with mismatched dimension"
                );
                continue;
            }

            model.by_token.insert(token.to_string(), model.entries.len());
            model.entries.push(VectorEntry {
                token: token.to_string(),
                vector,
            });
        }

        info!(
            vectors = model.entries.len(),
            dims = model.dims,
            "semantic model loaded"
        );
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Tokens most similar to the given token: cosine at or above the
    /// threshold, best first, ties broken lexicographically, at most
    /// `max_synonyms` entries. Unknown tokens have no synonyms.
    pub fn find_synonyms(&self, token: &str) -> Vec<String> {
        let Some(&idx) = self.by_token.get(token) else {
            return Vec::new();
        };
        let target = &self.entries[idx];

        let mut scored: Vec<(OrderedFloat<f32>, &str)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .filter_map(|(_, entry)| {
                let sim = cosine_similarity(&target.vector, &entry.vector);
                (sim >= self.threshold).then_some((OrderedFloat(sim), entry.token.as_str()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(self.max_synonyms)
            .map(|(_, token)| token.to_string())
            .collect()
    }
}
