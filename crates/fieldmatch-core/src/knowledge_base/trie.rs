//! Arena-backed prefix trie over field names and labels.

use std::collections::{BTreeMap, VecDeque};

use fieldmatch_model::FieldKey;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, usize>,
    keys: Vec<FieldKey>,
}

/// Prefix trie mapping words to the fields that carry them.
///
/// Nodes live in a flat arena and refer to their children by index.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
    words: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            words: 0,
        }
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str, key: FieldKey) {
        let mut node = 0;
        for ch in word.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }
        let keys = &mut self.nodes[node].keys;
        if keys.is_empty() {
            self.words += 1;
        }
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Fields whose word starts with `prefix`, shortest completions first.
    pub fn prefix_match(&self, prefix: &str, limit: usize) -> Vec<FieldKey> {
        let mut results = Vec::new();
        if limit == 0 {
            return results;
        }
        let mut node = 0;
        for ch in prefix.chars() {
            match self.nodes[node].children.get(&ch) {
                Some(&child) => node = child,
                None => return results,
            }
        }
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            let entry = &self.nodes[current];
            for key in &entry.keys {
                results.push(key.clone());
                if results.len() == limit {
                    return results;
                }
            }
            queue.extend(entry.children.values().copied());
        }
        results
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie() -> PrefixTrie {
        let mut trie = PrefixTrie::new();
        trie.insert("email", FieldKey::new("res.partner", "email"));
        trie.insert("email_cc", FieldKey::new("crm.lead", "email_cc"));
        trie.insert("email", FieldKey::new("res.company", "email"));
        trie.insert("name", FieldKey::new("res.partner", "name"));
        trie
    }

    #[test]
    fn shortest_completions_come_first() {
        let hits = trie().prefix_match("em", 10);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], FieldKey::new("res.partner", "email"));
        assert_eq!(hits[2], FieldKey::new("crm.lead", "email_cc"));
    }

    #[test]
    fn respects_limit_and_misses() {
        let trie = trie();
        assert_eq!(trie.prefix_match("e", 1).len(), 1);
        assert!(trie.prefix_match("x", 5).is_empty());
        assert!(trie.prefix_match("e", 0).is_empty());
        assert_eq!(trie.len(), 3);
    }
}
