//! Per-column matching context handed to every strategy.

use std::collections::BTreeSet;

use fieldmatch_model::{ColumnProfile, FieldDefinition};

use crate::knowledge_base::KnowledgeBase;

/// Read-only view of one column together with its sheet and model scope.
///
/// `target_models` is a hard restriction: no strategy emits a field outside
/// it. `candidate_models` only narrows the scan-based strategies and steers
/// model priority; index hits outside it are still emitted.
#[derive(Debug, Clone, Copy)]
pub struct MatchingContext<'a> {
    pub knowledge_base: &'a KnowledgeBase,
    pub profile: &'a ColumnProfile,
    pub all_profiles: &'a [ColumnProfile],
    pub target_models: Option<&'a BTreeSet<String>>,
    pub candidate_models: Option<&'a BTreeSet<String>>,
}

impl<'a> MatchingContext<'a> {
    /// Context without model restrictions.
    pub fn new(
        knowledge_base: &'a KnowledgeBase,
        profile: &'a ColumnProfile,
        all_profiles: &'a [ColumnProfile],
    ) -> Self {
        Self {
            knowledge_base,
            profile,
            all_profiles,
            target_models: None,
            candidate_models: None,
        }
    }

    #[must_use]
    /// Restrict every strategy to `models`.
    pub fn with_target_models(mut self, models: Option<&'a BTreeSet<String>>) -> Self {
        self.target_models = models;
        self
    }

    #[must_use]
    /// Narrow the scan-based strategies to `models`; an empty set is ignored.
    pub fn with_candidate_models(mut self, models: Option<&'a BTreeSet<String>>) -> Self {
        self.candidate_models = models.filter(|set| !set.is_empty());
        self
    }

    /// Name of the column under test.
    pub fn column_name(&self) -> &'a str {
        &self.profile.name
    }

    /// Returns true unless a target restriction excludes `model`.
    pub fn allows_model(&self, model: &str) -> bool {
        self.target_models
            .is_none_or(|targets| targets.contains(model))
    }

    /// Returns true if `model` is in the candidate set.
    pub fn is_candidate_model(&self, model: &str) -> bool {
        self.candidate_models
            .is_some_and(|candidates| candidates.contains(model))
    }

    /// Fields the scan-based strategies should consider.
    ///
    /// The target restriction wins, then the candidate set, then the whole
    /// schema.
    pub fn candidate_fields(&self) -> Vec<&'a FieldDefinition> {
        let kb = self.knowledge_base;
        match self.target_models.or(self.candidate_models) {
            Some(models) => models
                .iter()
                .flat_map(|model| kb.fields_of_model(model))
                .collect(),
            None => kb.fields().collect(),
        }
    }
}
