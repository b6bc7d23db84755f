use std::collections::BTreeSet;

use fieldmatch_model::FieldMapping;

use super::{MatchStrategy, StrategyKind, keep_best, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::{
    name_tokens, normalize_label, normalize_name, sequence_ratio, substring_ratio, token_jaccard,
};

const SEQUENCE_WEIGHT: f64 = 0.5;
const JACCARD_WEIGHT: f64 = 0.3;
const SUBSTRING_WEIGHT: f64 = 0.2;
const MIN_COMBINED: f64 = 0.6;
const FUZZY_FACTOR: f64 = 0.85;
const MAX_CANDIDATES: usize = 10;

/// Blend of the three string similarities.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Similarity {
    sequence: f64,
    jaccard: f64,
    substring: f64,
}

impl Similarity {
    fn between(a: &str, a_tokens: &BTreeSet<String>, b: &str, b_tokens: &BTreeSet<String>) -> Self {
        Self {
            sequence: sequence_ratio(a, b),
            jaccard: token_jaccard(a_tokens, b_tokens),
            substring: substring_ratio(a, b),
        }
    }

    fn combined(&self) -> f64 {
        SEQUENCE_WEIGHT * self.sequence + JACCARD_WEIGHT * self.jaccard + SUBSTRING_WEIGHT * self.substring
    }
}

/// Approximate string similarity against every candidate's name and label.
#[derive(Debug, Clone)]
pub struct FuzzyStrategy {
    weight: f64,
}

impl FuzzyStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MatchStrategy for FuzzyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fuzzy
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let column = ctx.column_name();
        let name_form = normalize_name(column);
        if name_form.is_empty() {
            return Ok(Vec::new());
        }
        let label_form = normalize_label(column);
        let column_tokens = name_tokens(column);

        let mut candidates = Vec::new();
        for field in ctx.candidate_fields() {
            let by_name = Similarity::between(
                &name_form,
                &column_tokens,
                &field.name.to_lowercase(),
                &name_tokens(&field.name),
            );
            let by_label = Similarity::between(
                &label_form,
                &column_tokens,
                &normalize_label(&field.label),
                &name_tokens(&field.label),
            );
            let (best, against) = if by_label.combined() > by_name.combined() {
                (by_label, "label")
            } else {
                (by_name, "name")
            };
            let combined = best.combined();
            if combined < MIN_COMBINED {
                continue;
            }
            let Some(mut candidate) = weighted_candidate(
                ctx,
                self.kind(),
                self.weight,
                &field.key(),
                combined * FUZZY_FACTOR,
                format!("{against} similarity {:.0}%", combined * 100.0),
            ) else {
                continue;
            };
            candidate.scores.insert("Fuzzy.sequence".to_string(), best.sequence);
            candidate.scores.insert("Fuzzy.jaccard".to_string(), best.jaccard);
            candidate.scores.insert("Fuzzy.substring".to_string(), best.substring);
            candidates.push(candidate);
        }
        Ok(keep_best(candidates, MAX_CANDIDATES))
    }
}
