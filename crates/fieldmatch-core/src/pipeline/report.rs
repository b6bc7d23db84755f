//! Per-column and per-sheet match results.

use std::collections::BTreeMap;
use std::time::Duration;

use fieldmatch_model::{ConfidenceTier, FieldMapping};
use serde::Serialize;

use crate::analysis::{DomainMatch, ModelRecommendation};

/// Outcome of one strategy on one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRun {
    pub strategy: String,
    /// Candidates the strategy contributed; zero after a failure.
    pub candidates: usize,
    #[serde(skip)]
    pub elapsed: Duration,
    /// Why the strategy's output was discarded, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl StrategyRun {
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Adjusted and ranked candidates of one column, before thresholding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedColumn {
    pub column: String,
    pub candidates: Vec<FieldMapping>,
    pub runs: Vec<StrategyRun>,
}

/// Final mappings for one column, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMatch {
    pub column: String,
    pub mappings: Vec<FieldMapping>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<StrategyRun>,
}

impl ColumnMatch {
    pub fn best(&self) -> Option<&FieldMapping> {
        self.mappings.first()
    }

    pub fn is_unmapped(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn failed_strategies(&self) -> impl Iterator<Item = &StrategyRun> {
        self.runs.iter().filter(|run| run.failed())
    }
}

/// Mappings for every column of a sheet plus the sheet-level analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetMatch {
    pub sheet_name: String,
    /// Qualifying business domains, best first.
    pub domains: Vec<DomainMatch>,
    /// Models recommended from the column names, best first.
    pub recommended_models: Vec<ModelRecommendation>,
    /// Candidate-model set actually used for matching.
    pub candidate_models: Vec<String>,
    /// One entry per input column in input order, then any derived columns.
    pub columns: Vec<ColumnMatch>,
}

impl SheetMatch {
    /// Column name to its ordered mappings.
    pub fn by_column(&self) -> BTreeMap<&str, &[FieldMapping]> {
        self.columns
            .iter()
            .map(|column| (column.column.as_str(), column.mappings.as_slice()))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMatch> {
        self.columns.iter().find(|column| column.column == name)
    }

    /// Columns that produced no mapping above the medium threshold.
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.is_unmapped())
            .map(|column| column.column.as_str())
            .collect()
    }

    /// Best mapping per mapped column.
    pub fn best_mappings(&self) -> Vec<&FieldMapping> {
        self.columns.iter().filter_map(ColumnMatch::best).collect()
    }

    /// Count of best mappings per tier.
    pub fn count_by_tier(&self) -> BTreeMap<ConfidenceTier, usize> {
        let mut counts = BTreeMap::new();
        for mapping in self.best_mappings() {
            if let Some(tier) = mapping.tier {
                *counts.entry(tier).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Mean confidence of the best mappings, 0.0 when nothing mapped.
    pub fn mean_confidence(&self) -> f64 {
        let best = self.best_mappings();
        if best.is_empty() {
            return 0.0;
        }
        best.iter().map(|mapping| mapping.confidence).sum::<f64>() / best.len() as f64
    }
}
