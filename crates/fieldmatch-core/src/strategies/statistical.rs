use fieldmatch_model::{FieldDefinition, FieldMapping, FieldType};

use super::{MatchStrategy, StrategyKind, check_ratio, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::{name_tokens, split_words, tokens_mention};

const HIGH_UNIQUENESS: f64 = 0.95;
const LOW_UNIQUENESS: f64 = 0.10;
const IDENTIFIER_FACTOR: f64 = 0.70;
const CATEGORICAL_BASE: f64 = 0.55;
const SELECTION_BONUS: f64 = 1.2;
const PERCENTAGE_SCORE: f64 = 0.55;

/// Column-name words that mark an identifier column.
const IDENTIFIER_TOKENS: &[&str] = &["id", "ref", "reference", "code", "number", "no", "key", "sku"];
const CATEGORICAL_TOKENS: &[&str] = &["state", "status", "category", "type", "stage"];
const PERCENTAGE_TOKENS: &[&str] = &["percent", "percentage", "rate", "ratio", "discount", "probability"];

/// Value distribution hints: identifiers, categories and percentages.
#[derive(Debug, Clone)]
pub struct StatisticalStrategy {
    weight: f64,
}

impl StatisticalStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MatchStrategy for StatisticalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StatisticalSimilarity
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let profile = ctx.profile;
        let uniqueness = check_ratio(ctx, "uniqueness ratio", profile.uniqueness_ratio)?;
        if profile.non_null_count == 0 {
            return Ok(Vec::new());
        }
        let identifier_column = split_words(ctx.column_name())
            .iter()
            .any(|word| IDENTIFIER_TOKENS.contains(&word.as_str()));
        let percentage_range = profile.detected_type.is_numeric()
            && matches!(
                (profile.min_value, profile.max_value),
                (Some(min), Some(max)) if min >= 0.0 && max <= 100.0
            );

        let mut candidates = Vec::new();
        for field in ctx.candidate_fields() {
            let scored = if uniqueness >= HIGH_UNIQUENESS && identifier_column && is_identifier_field(field) {
                Some((
                    IDENTIFIER_FACTOR * uniqueness,
                    format!("{:.0}% unique values suit an identifier field", uniqueness * 100.0),
                ))
            } else if uniqueness <= LOW_UNIQUENESS
                && profile.unique_count >= 2
                && tokens_mention(&name_tokens(&field.name), CATEGORICAL_TOKENS)
            {
                let bonus = if field.field_type == FieldType::Selection {
                    SELECTION_BONUS
                } else {
                    1.0
                };
                Some((
                    CATEGORICAL_BASE * bonus,
                    format!("{} distinct values suit a categorical field", profile.unique_count),
                ))
            } else if percentage_range
                && field.field_type.is_numeric()
                && tokens_mention(&name_tokens(&field.name), PERCENTAGE_TOKENS)
            {
                Some((
                    PERCENTAGE_SCORE,
                    "numeric range within 0-100 suits a percentage field".to_string(),
                ))
            } else {
                None
            };
            let Some((raw, rationale)) = scored else { continue };
            candidates.extend(weighted_candidate(
                ctx,
                self.kind(),
                self.weight,
                &field.key(),
                raw,
                rationale,
            ));
        }
        Ok(candidates)
    }
}

/// Identifier-like fields: `ref`, `code`, `default_code`, `barcode_ref`...
fn is_identifier_field(field: &FieldDefinition) -> bool {
    if field.field_type.is_relational() {
        return false;
    }
    let words = split_words(&field.name);
    let first = words.first().map(String::as_str);
    let last = words.last().map(String::as_str);
    matches!(first, Some("id" | "ref" | "code" | "reference"))
        || matches!(last, Some("ref" | "code" | "reference"))
}
