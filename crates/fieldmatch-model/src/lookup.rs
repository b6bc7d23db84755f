use std::collections::HashMap;

/// Map keyed by case-folded, whitespace-trimmed text.
///
/// The first value inserted for a key wins.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveMap<V> {
    map: HashMap<String, V>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns false on collision.
    pub fn insert(&mut self, key: &str, value: V) -> bool {
        let folded = fold(key);
        if self.map.contains_key(&folded) {
            return false;
        }
        self.map.insert(folded, value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.map.get(&fold(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(&fold(key))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn fold(key: &str) -> String {
    key.trim().to_lowercase()
}
