use fieldmatch_model::{FieldMapping, FieldType, ScalarType};

use super::{MatchStrategy, StrategyKind, field_tokens, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::name_tokens;

/// Text fields accept almost anything.
const TEXT_FALLBACK: f64 = 0.60;
const MIN_COMPATIBILITY: f64 = 0.5;

/// Compatibility of a detected column type with a target field type.
///
/// Returns `None` when the pair is not compatible at all.
pub fn type_compatibility(detected: ScalarType, target: FieldType) -> Option<f64> {
    use FieldType as F;
    use ScalarType as S;

    let score = match (detected, target) {
        (S::Empty, _) => return None,
        (S::Integer, F::Integer) => 0.95,
        (S::Integer, F::Float) => 0.85,
        (S::Integer, F::Monetary) => 0.80,
        (S::Integer, F::Many2one) => 0.80,
        (S::Integer, F::Boolean | F::Selection) => 0.50,
        (S::Float, F::Float) => 0.95,
        (S::Float, F::Monetary) => 0.90,
        (S::Float, F::Integer) => 0.70,
        (S::String, F::Char) => 0.85,
        (S::String, F::Text) => 0.80,
        (S::String, F::Selection) => 0.75,
        (S::String, F::Html) => 0.70,
        (S::String, F::Many2one) => 0.70,
        (S::String, F::Many2many) => 0.55,
        (S::Boolean, F::Boolean) => 0.95,
        (S::Boolean, F::Selection) => 0.55,
        (S::Date, F::Date) => 0.95,
        (S::Date, F::Datetime) => 0.85,
        (S::Datetime, F::Datetime) => 0.95,
        (S::Datetime, F::Date) => 0.80,
        (_, F::Char | F::Text) => TEXT_FALLBACK,
        _ => return None,
    };
    Some(score)
}

/// Detected column type fits a field type.
///
/// Only fields sharing a name token with the column are scored.
#[derive(Debug, Clone)]
pub struct DataTypeStrategy {
    weight: f64,
}

impl DataTypeStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MatchStrategy for DataTypeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DataTypeCompatibility
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let column_tokens = name_tokens(ctx.column_name());
        if column_tokens.is_empty() {
            return Ok(Vec::new());
        }
        let detected = ctx.profile.detected_type;
        let mut candidates = Vec::new();
        for field in ctx.candidate_fields() {
            let Some(score) = type_compatibility(detected, field.field_type) else {
                continue;
            };
            if score < MIN_COMPATIBILITY {
                continue;
            }
            let tokens = field_tokens(field);
            if tokens.is_disjoint(&column_tokens) {
                continue;
            }
            candidates.extend(weighted_candidate(
                ctx,
                self.kind(),
                self.weight,
                &field.key(),
                score,
                format!("{} values fit {} field", detected.as_str(), field.field_type),
            ));
        }
        Ok(candidates)
    }
}
