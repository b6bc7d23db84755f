//! Lookup indexes over the loaded fields.

use std::collections::HashMap;

use fieldmatch_model::{FieldDefinition, FieldKey, FieldType};

use super::trie::PrefixTrie;
use crate::text::normalize_label;

/// Secondary indexes keyed by name, label, type, related model and selection value.
///
/// Name keys are lowercased technical names; label keys use the label form
/// from [`normalize_label`]. Every lookup returns keys in load order.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    by_name: HashMap<String, Vec<FieldKey>>,
    by_label: HashMap<String, Vec<FieldKey>>,
    by_type: HashMap<FieldType, Vec<FieldKey>>,
    by_related_model: HashMap<String, Vec<FieldKey>>,
    by_selection_value: HashMap<String, Vec<FieldKey>>,
    name_trie: PrefixTrie,
    label_trie: PrefixTrie,
}

impl FieldIndex {
    pub fn build<'a>(fields: impl IntoIterator<Item = &'a FieldDefinition>) -> Self {
        let mut index = Self::default();
        for field in fields {
            index.insert(field);
        }
        index
    }

    fn insert(&mut self, field: &FieldDefinition) {
        let key = field.key();
        let name = field.name.trim().to_lowercase();
        let label = normalize_label(&field.label);

        push_unique(&mut self.by_name, name.clone(), &key);
        if !label.is_empty() {
            push_unique(&mut self.by_label, label.clone(), &key);
            self.label_trie.insert(&label, key.clone());
        }
        self.by_type
            .entry(field.field_type)
            .or_default()
            .push(key.clone());
        if let Some(related) = &field.related_model {
            push_unique(&mut self.by_related_model, related.clone(), &key);
        }
        for option in &field.selection_options {
            for text in [&option.value, &option.display_name] {
                let folded = text.trim().to_lowercase();
                if !folded.is_empty() {
                    push_unique(&mut self.by_selection_value, folded, &key);
                }
            }
        }
        self.name_trie.insert(&name, key);
    }

    pub fn by_name(&self, name: &str) -> &[FieldKey] {
        lookup(&self.by_name, &name.trim().to_lowercase())
    }

    pub fn by_label(&self, label: &str) -> &[FieldKey] {
        lookup(&self.by_label, &normalize_label(label))
    }

    pub fn by_type(&self, field_type: FieldType) -> &[FieldKey] {
        self.by_type
            .get(&field_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn by_related_model(&self, model: &str) -> &[FieldKey] {
        lookup(&self.by_related_model, model)
    }

    pub fn by_selection_value(&self, value: &str) -> &[FieldKey] {
        lookup(&self.by_selection_value, &value.trim().to_lowercase())
    }

    pub fn prefix_match_name(&self, prefix: &str, limit: usize) -> Vec<FieldKey> {
        self.name_trie
            .prefix_match(&prefix.trim().to_lowercase(), limit)
    }

    pub fn prefix_match_label(&self, prefix: &str, limit: usize) -> Vec<FieldKey> {
        self.label_trie.prefix_match(&normalize_label(prefix), limit)
    }

    /// Number of distinct selection lookup keys.
    pub fn selection_key_count(&self) -> usize {
        self.by_selection_value.len()
    }
}

fn push_unique(map: &mut HashMap<String, Vec<FieldKey>>, key: String, field: &FieldKey) {
    let entries = map.entry(key).or_default();
    if !entries.contains(field) {
        entries.push(field.clone());
    }
}

fn lookup<'a>(map: &'a HashMap<String, Vec<FieldKey>>, key: &str) -> &'a [FieldKey] {
    map.get(key).map(Vec::as_slice).unwrap_or_default()
}
