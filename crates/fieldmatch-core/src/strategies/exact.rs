use std::collections::BTreeSet;

use fieldmatch_model::{FieldKey, FieldMapping};

use super::{MatchStrategy, StrategyKind, weighted_candidate};
use crate::analysis::parse_compound_name;
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::normalize_name;

const EXACT_CONFIDENCE: f64 = 1.0;
const COMPOUND_CONFIDENCE: f64 = 0.95;

/// Column name equals a field's technical name.
///
/// Also emits a slightly weaker candidate when the column decomposes into an
/// entity prefix and a field name that the prefix's model owns.
#[derive(Debug, Clone)]
pub struct ExactNameStrategy {
    weight: f64,
}

impl ExactNameStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MatchStrategy for ExactNameStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ExactName
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let kb = ctx.knowledge_base;
        let column = ctx.column_name();
        let mut seen = BTreeSet::new();
        let mut candidates = Vec::new();

        let lowered = column.trim().to_lowercase();
        let normalized = normalize_name(column);
        for query in [lowered.as_str(), normalized.as_str()] {
            if query.is_empty() {
                continue;
            }
            for key in kb.by_field_name(query) {
                if !ctx.allows_model(&key.model) || !seen.insert(key.clone()) {
                    continue;
                }
                candidates.extend(weighted_candidate(
                    ctx,
                    self.kind(),
                    self.weight,
                    key,
                    EXACT_CONFIDENCE,
                    format!("column name matches field name '{}'", key.field),
                ));
            }
        }

        let compound = parse_compound_name(column);
        if let (Some(prefix), Some(model)) = (&compound.prefix, &compound.suggested_model) {
            let key = FieldKey::new(model.clone(), compound.field.clone());
            if kb.field(&key).is_some() && ctx.allows_model(model) && !seen.contains(&key) {
                candidates.extend(weighted_candidate(
                    ctx,
                    self.kind(),
                    self.weight,
                    &key,
                    COMPOUND_CONFIDENCE,
                    format!("compound name: '{prefix}' suggests {model}, which owns '{}'", key.field),
                ));
            }
        }
        Ok(candidates)
    }
}
