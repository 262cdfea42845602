//! Prefix tree over lexicon keys, used by autocomplete.
//!
//! Children are kept in a `BTreeMap` so a depth-first walk yields
//! completions in lexicographic order without a sort pass.

use std::collections::BTreeMap;

use crate::config::MIN_TOKEN_LENGTH;

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
}

/// Autocomplete prefix tree
#[derive(Clone, Debug, Default)]
pub struct Trie {
    root: TrieNode,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie from an iterator of tokens (lexicon keys)
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let mut trie = Self::new();
        for token in tokens {
            trie.insert(token);
        }
        trie
    }

    pub fn insert(&mut self, token: &str) {
        let mut node = &mut self.root;
        for ch in token.chars() {
            node = node.children.entry(ch).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Up to `limit` tokens starting with `prefix`, in lexicographic order
    /// of the remainder. Tokens shorter than the autocomplete minimum are
    /// filtered; an empty prefix completes to nothing.
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<String> {
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut node = &self.root;
        for ch in prefix.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let mut out = Vec::new();
        let mut buf = prefix.to_string();
        Self::collect(node, &mut buf, limit, &mut out);
        out
    }

    /// Suggestions for a multi-word query being typed: complete the text
    /// after the last space and re-attach everything before it.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let split = query.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let (base, prefix) = query.split_at(split);
        self.autocomplete(prefix, limit)
            .into_iter()
            .map(|word| format!("{}{}", base, word))
            .collect()
    }

    fn collect(node: &TrieNode, buf: &mut String, limit: usize, out: &mut Vec<String>) {
        if out.len() >= limit {
            return;
        }
        if node.terminal && buf.chars().count() >= MIN_TOKEN_LENGTH {
            out.push(buf.clone());
        }
        for (ch, child) in &node.children {
            if out.len() >= limit {
                return;
            }
            buf.push(*ch);
            Self::collect(child, buf, limit, out);
            buf.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Trie {
        Trie::from_tokens(["neural", "neuron", "network", "net", "deep"])
    }

    #[test]
    fn test_autocomplete_lexicographic() {
        let trie = fixture();
        assert_eq!(trie.autocomplete("neu", 10), vec!["neural", "neuron"]);
        assert_eq!(trie.autocomplete("net", 10), vec!["net", "network"]);
    }

    #[test]
    fn test_autocomplete_respects_limit() {
        let trie = fixture();
        assert_eq!(trie.autocomplete("ne", 1), vec!["net"]);
    }

    #[test]
    fn test_empty_prefix_completes_to_nothing() {
        let trie = fixture();
        assert!(trie.autocomplete("", 10).is_empty());
    }

    #[test]
    fn test_unknown_prefix() {
        let trie = fixture();
        assert!(trie.autocomplete("xyz", 10).is_empty());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = fixture();
        assert_eq!(trie.len(), 5);
        trie.insert("neural");
        assert_eq!(trie.len(), 5);
    }

    #[test]
    fn test_short_tokens_filtered() {
        let trie = Trie::from_tokens(["ab", "abc"]);
        assert_eq!(trie.autocomplete("a", 10), vec!["abc"]);
    }

    #[test]
    fn test_multi_word_assembly() {
        let trie = fixture();
        assert_eq!(
            trie.suggest("deep neu", 10),
            vec!["deep neural", "deep neuron"]
        );
        // No trailing word to complete
        assert!(trie.suggest("deep ", 10).is_empty());
        // Single word queries complete directly
        assert_eq!(trie.suggest("dee", 10), vec!["deep"]);
    }

    #[test]
    fn test_prefix_monotonicity() {
        let trie = fixture();
        let wide = trie.autocomplete("ne", usize::MAX);
        let narrow = trie.autocomplete("neu", usize::MAX);
        for token in &narrow {
            assert!(wide.contains(token));
        }
    }
}
