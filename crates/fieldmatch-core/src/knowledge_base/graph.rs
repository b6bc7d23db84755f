//! Model relationship graph built from relational fields.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use fieldmatch_model::FieldDefinition;

/// Directed and undirected adjacency between models.
///
/// A relational field on model A pointing at model B adds the edge A -> B.
/// Neighbourhood queries walk the undirected view.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    outgoing: BTreeMap<String, BTreeSet<String>>,
    undirected: BTreeMap<String, BTreeSet<String>>,
    edges: usize,
}

impl RelationshipGraph {
    pub fn build<'a>(fields: impl IntoIterator<Item = &'a FieldDefinition>) -> Self {
        let mut graph = Self::default();
        for field in fields {
            if !field.field_type.is_relational() {
                continue;
            }
            if let Some(target) = &field.related_model {
                graph.add_edge(&field.model, target);
            }
        }
        graph
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        if self
            .outgoing
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string())
        {
            self.edges += 1;
        }
        self.undirected
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.undirected
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
    }

    /// Models this model points at through its own relational fields.
    pub fn successors(&self, model: &str) -> impl Iterator<Item = &str> {
        self.outgoing
            .get(model)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    pub fn neighbours(&self, model: &str) -> impl Iterator<Item = &str> {
        self.undirected
            .get(model)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// Every model reachable within `max_depth` undirected hops, excluding `model`.
    pub fn related_models(&self, model: &str, max_depth: usize) -> BTreeSet<String> {
        let mut seen = BTreeSet::from([model.to_string()]);
        let mut queue = VecDeque::from([(model.to_string(), 0usize)]);
        while let Some((current, depth)) = queue.pop_front() {
            if depth == max_depth {
                continue;
            }
            for next in self.neighbours(&current) {
                if seen.insert(next.to_string()) {
                    queue.push_back((next.to_string(), depth + 1));
                }
            }
        }
        seen.remove(model);
        seen
    }

    /// Shortest undirected path from `from` to `to`, both ends included.
    pub fn path_between(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if from == to {
            return Some(vec![from.to_string()]);
        }
        let mut parents: BTreeMap<String, String> = BTreeMap::new();
        let mut queue = VecDeque::from([from.to_string()]);
        parents.insert(from.to_string(), String::new());
        while let Some(current) = queue.pop_front() {
            for next in self.neighbours(&current) {
                if parents.contains_key(next) {
                    continue;
                }
                parents.insert(next.to_string(), current.clone());
                if next == to {
                    let mut path = vec![to.to_string()];
                    let mut cursor = current.clone();
                    while !cursor.is_empty() {
                        path.push(cursor.clone());
                        cursor = parents.get(&cursor).cloned().unwrap_or_default();
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next.to_string());
            }
        }
        None
    }

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges
    }
}
