//! Candidate mapping types produced by the matching engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::FieldKey;

/// Confidence tier of a surviving candidate.
///
/// Candidates below the medium threshold never reach the output, so there
/// is no tier for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// At or above the medium threshold but below the high threshold.
    Medium,
    /// At or above the high threshold.
    High,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }

    /// Returns a human-readable description of the tier.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate mapping from a source column to a target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Source column name from the input sheet.
    pub source_column: String,
    pub target_model: String,
    pub target_field: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
    /// Human-readable explanation chain, one clause per contributing signal.
    pub rationale: String,
    /// Strategy name, or `Combined[...]` once merged.
    pub provenance: String,
    /// Names of the strategies that voted for this field.
    pub strategies: Vec<String>,
    /// Named sub-scores for audit display.
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub tier: Option<ConfidenceTier>,
    /// Optional transformation to apply (e.g. concatenation of columns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<FieldMapping>,
}

impl FieldMapping {
    /// Create a single-strategy candidate whose only sub-score is its confidence.
    pub fn new(
        source_column: impl Into<String>,
        key: &FieldKey,
        confidence: f64,
        strategy: &str,
        rationale: impl Into<String>,
    ) -> Self {
        let mut scores = BTreeMap::new();
        scores.insert(strategy.to_string(), confidence);
        Self {
            source_column: source_column.into(),
            target_model: key.model.clone(),
            target_field: key.field.clone(),
            confidence,
            rationale: rationale.into(),
            provenance: strategy.to_string(),
            strategies: vec![strategy.to_string()],
            scores,
            tier: None,
            transformation: None,
            alternatives: Vec::new(),
        }
    }

    pub fn key(&self) -> FieldKey {
        FieldKey::new(self.target_model.clone(), self.target_field.clone())
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Append a clause to the rationale chain.
    pub fn push_rationale(&mut self, clause: &str) {
        if self.rationale.is_empty() {
            self.rationale = clause.to_string();
        } else {
            self.rationale.push_str("; ");
            self.rationale.push_str(clause);
        }
    }
}
