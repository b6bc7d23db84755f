use std::collections::BTreeSet;

use fieldmatch_model::FieldMapping;

use super::{MatchStrategy, StrategyKind, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::{normalize_label, sequence_ratio};

const EXACT_FACTOR: f64 = 0.98;
const PREFIX_FACTOR: f64 = 0.85;
/// Prefix fallback runs only when exact label hits are fewer than this.
const PREFIX_FALLBACK_BELOW: usize = 5;
const PREFIX_MIN_CHARS: usize = 3;
const PREFIX_LIMIT: usize = 20;
const PREFIX_MIN_SIMILARITY: f64 = 0.5;

/// Column name matches a field's human label.
#[derive(Debug, Clone)]
pub struct LabelStrategy {
    weight: f64,
}

impl LabelStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MatchStrategy for LabelStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Label
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let kb = ctx.knowledge_base;
        let query = normalize_label(ctx.column_name());
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let column_text = ctx.column_name().trim().to_lowercase();
        let mut seen = BTreeSet::new();
        let mut candidates = Vec::new();

        let exact = kb.by_label(&query);
        for key in exact {
            if !ctx.allows_model(&key.model) || !seen.insert(key.clone()) {
                continue;
            }
            let Some(field) = kb.field(key) else { continue };
            let similarity = sequence_ratio(&column_text, &field.label.trim().to_lowercase());
            candidates.extend(weighted_candidate(
                ctx,
                self.kind(),
                self.weight,
                key,
                similarity * EXACT_FACTOR,
                format!("column matches label '{}'", field.label),
            ));
        }

        if exact.len() < PREFIX_FALLBACK_BELOW && query.chars().count() >= PREFIX_MIN_CHARS {
            for key in kb.prefix_match_label(&query, PREFIX_LIMIT) {
                if !ctx.allows_model(&key.model) || seen.contains(&key) {
                    continue;
                }
                let Some(field) = kb.field(&key) else { continue };
                let similarity = sequence_ratio(&query, &normalize_label(&field.label));
                if similarity < PREFIX_MIN_SIMILARITY {
                    continue;
                }
                candidates.extend(weighted_candidate(
                    ctx,
                    self.kind(),
                    self.weight,
                    &key,
                    similarity * PREFIX_FACTOR,
                    format!("label '{}' starts with '{query}'", field.label),
                ));
                seen.insert(key);
            }
        }
        Ok(candidates)
    }
}
