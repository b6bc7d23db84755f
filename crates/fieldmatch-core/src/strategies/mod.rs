//! The eight matching strategies.
//!
//! Each strategy reads one class of signal from a [`MatchingContext`] and
//! returns scored candidates. A strategy multiplies its raw confidence by
//! its configured weight before returning, so a zero weight silences it.

mod contextual;
mod data_type;
mod exact;
mod fuzzy;
mod label;
mod pattern;
mod selection;
mod statistical;

use std::collections::BTreeSet;
use std::fmt;

use fieldmatch_model::{FieldDefinition, FieldKey, FieldMapping};
use serde::Serialize;

use crate::config::MatcherConfig;
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::name_tokens;

pub use contextual::ContextualStrategy;
pub use data_type::{DataTypeStrategy, type_compatibility};
pub use exact::ExactNameStrategy;
pub use fuzzy::FuzzyStrategy;
pub use label::LabelStrategy;
pub use pattern::PatternStrategy;
pub use selection::SelectionValueStrategy;
pub use statistical::StatisticalStrategy;

/// Identity of a strategy; also the provenance tag on its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StrategyKind {
    ExactName,
    Label,
    SelectionValue,
    DataTypeCompatibility,
    Pattern,
    StatisticalSimilarity,
    Contextual,
    Fuzzy,
}

impl StrategyKind {
    /// Registration order used by the pipeline.
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::ExactName,
        StrategyKind::Label,
        StrategyKind::SelectionValue,
        StrategyKind::DataTypeCompatibility,
        StrategyKind::Pattern,
        StrategyKind::StatisticalSimilarity,
        StrategyKind::Contextual,
        StrategyKind::Fuzzy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactName => "ExactName",
            Self::Label => "Label",
            Self::SelectionValue => "SelectionValue",
            Self::DataTypeCompatibility => "DataTypeCompatibility",
            Self::Pattern => "Pattern",
            Self::StatisticalSimilarity => "StatisticalSimilarity",
            Self::Contextual => "Contextual",
            Self::Fuzzy => "Fuzzy",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scoring signal.
///
/// Implementations hold only their weight and are shared read-only across
/// threads.
pub trait MatchStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn weight(&self) -> f64;

    /// Score the context's column. Candidates carry weighted confidence.
    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError>;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// All eight strategies in registration order, weighted from `config`.
pub fn default_strategies(config: &MatcherConfig) -> Vec<Box<dyn MatchStrategy>> {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| -> Box<dyn MatchStrategy> {
            let weight = config.weight(kind);
            match kind {
                StrategyKind::ExactName => Box::new(ExactNameStrategy::new(weight)),
                StrategyKind::Label => Box::new(LabelStrategy::new(weight)),
                StrategyKind::SelectionValue => Box::new(SelectionValueStrategy::new(weight)),
                StrategyKind::DataTypeCompatibility => Box::new(DataTypeStrategy::new(weight)),
                StrategyKind::Pattern => Box::new(PatternStrategy::new(weight)),
                StrategyKind::StatisticalSimilarity => Box::new(StatisticalStrategy::new(weight)),
                StrategyKind::Contextual => Box::new(ContextualStrategy::new(weight)),
                StrategyKind::Fuzzy => Box::new(FuzzyStrategy::new(weight)),
            }
        })
        .collect()
}

/// Build a weighted candidate, or `None` when the weighted confidence is zero.
pub(crate) fn weighted_candidate(
    ctx: &MatchingContext<'_>,
    kind: StrategyKind,
    weight: f64,
    key: &FieldKey,
    raw: f64,
    rationale: String,
) -> Option<FieldMapping> {
    let confidence = (raw * weight).clamp(0.0, 1.0);
    if confidence <= 0.0 || confidence.is_nan() {
        return None;
    }
    Some(FieldMapping::new(
        ctx.column_name(),
        key,
        confidence,
        kind.as_str(),
        rationale,
    ))
}

/// Name and label tokens of a field.
pub(crate) fn field_tokens(field: &FieldDefinition) -> BTreeSet<String> {
    let mut tokens = name_tokens(&field.name);
    tokens.extend(name_tokens(&field.label));
    tokens
}

/// Order by confidence descending, then key, and keep the first `limit`.
pub(crate) fn keep_best(mut candidates: Vec<FieldMapping>, limit: usize) -> Vec<FieldMapping> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.target_model.cmp(&b.target_model))
            .then_with(|| a.target_field.cmp(&b.target_field))
    });
    candidates.truncate(limit);
    candidates
}

/// Reject ratios that are not finite or lie outside [0, 1].
pub(crate) fn check_ratio(
    ctx: &MatchingContext<'_>,
    what: &str,
    value: f64,
) -> Result<f64, StrategyError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(StrategyError::InvalidProfile {
            column: ctx.column_name().to_string(),
            message: format!("{what} must lie in [0, 1], got {value}"),
        })
    }
}
