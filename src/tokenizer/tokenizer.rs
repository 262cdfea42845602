use std::collections::HashSet;

use crate::config::{MIN_WORD_LENGTH, STOP_WORDS};

/// A token emitted at a document position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub position: u32,
    pub text: String,
}

/// Deterministic text tokenizer shared by the indexing and query paths.
///
/// Tokens are maximal runs of ASCII letters taken from the lowercased
/// input. Every candidate run advances the position counter; only runs of
/// at least the minimum length that are not stop words are emitted, so
/// proximity stays meaningful across skipped words.
pub struct Tokenizer {
    stop_words: HashSet<&'static str>,
    min_word_length: usize,
}

impl Tokenizer {
    pub fn new(min_word_length: usize) -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            min_word_length,
        }
    }

    /// Tokenize a single string with the counter reset to zero
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut position = 0u32;
        let mut out = Vec::new();
        self.tokenize_into(text, &mut position, &mut out);
        out
    }

    /// Tokenize fields in canonical order with one running counter, so a
    /// position in one field is comparable to a position in another.
    pub fn tokenize_fields(&self, fields: &[&str]) -> Vec<Token> {
        let mut position = 0u32;
        let mut out = Vec::new();
        for field in fields {
            self.tokenize_into(field, &mut position, &mut out);
        }
        out
    }

    /// Tokenize one field, continuing an externally held position counter
    pub fn tokenize_from(&self, text: &str, position: &mut u32) -> Vec<Token> {
        let mut out = Vec::new();
        self.tokenize_into(text, position, &mut out);
        out
    }

    /// Emitted token strings only, in order (query path)
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|t| t.text).collect()
    }

    fn tokenize_into(&self, text: &str, position: &mut u32, out: &mut Vec<Token>) {
        let mut run = String::new();
        for ch in text.chars() {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_lowercase() {
                run.push(lower);
            } else if !run.is_empty() {
                self.flush_run(&mut run, position, out);
            }
        }
        if !run.is_empty() {
            self.flush_run(&mut run, position, out);
        }
    }

    fn flush_run(&self, run: &mut String, position: &mut u32, out: &mut Vec<Token>) {
        let candidate = std::mem::take(run);
        let pos = *position;
        *position += 1;
        if candidate.len() >= self.min_word_length && !self.stop_words.contains(candidate.as_str()) {
            out.push(Token {
                position: pos,
                text: candidate,
            });
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(MIN_WORD_LENGTH)
    }
}
