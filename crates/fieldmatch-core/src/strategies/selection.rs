use std::collections::{BTreeMap, BTreeSet};

use fieldmatch_model::{FieldKey, FieldMapping, SelectionOption};

use super::{MatchStrategy, StrategyKind, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;

const MIN_MATCH_RATIO: f64 = 0.5;
const MATCH_WEIGHT: f64 = 0.7;
const COVERAGE_WEIGHT: f64 = 0.3;

/// Column values overlap a selection field's options.
///
/// `match_ratio` is the share of distinct column values that name an option,
/// by value or display name; `coverage` is the share of the field's options
/// named at least once.
#[derive(Debug, Clone)]
pub struct SelectionValueStrategy {
    weight: f64,
}

impl SelectionValueStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

/// Column values and distinct options of one field hit by those values.
#[derive(Default)]
struct FieldHits<'a> {
    values: usize,
    options: BTreeSet<&'a str>,
}

fn option_matches(option: &SelectionOption, folded: &str) -> bool {
    [&option.value, &option.display_name]
        .into_iter()
        .any(|text| text.trim().to_lowercase() == folded)
}

impl MatchStrategy for SelectionValueStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SelectionValue
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let kb = ctx.knowledge_base;
        let values = ctx.profile.distinct_values();
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: BTreeMap<&FieldKey, FieldHits<'_>> = BTreeMap::new();
        for value in &values {
            for key in kb.by_selection_value(value) {
                if !ctx.allows_model(&key.model) {
                    continue;
                }
                let Some(field) = kb.field(key) else { continue };
                let Some(option) = field
                    .selection_options
                    .iter()
                    .find(|option| option_matches(option, value))
                else {
                    continue;
                };
                let entry = hits.entry(key).or_default();
                entry.values += 1;
                entry.options.insert(option.value.as_str());
            }
        }

        let mut candidates = Vec::new();
        for (key, field_hits) in hits {
            let Some(field) = kb.field(key) else { continue };
            let matched = field_hits.values;
            let match_ratio = matched as f64 / values.len() as f64;
            if match_ratio < MIN_MATCH_RATIO {
                continue;
            }
            let options = field.selection_options.len().max(1);
            let coverage = (field_hits.options.len() as f64 / options as f64).min(1.0);
            let raw = MATCH_WEIGHT * match_ratio + COVERAGE_WEIGHT * coverage;
            if let Some(mut candidate) = weighted_candidate(
                ctx,
                self.kind(),
                self.weight,
                key,
                raw,
                format!(
                    "{matched} of {} distinct values are options of {key}",
                    values.len()
                ),
            ) {
                candidate.scores.insert("SelectionValue.match_ratio".to_string(), match_ratio);
                candidate.scores.insert("SelectionValue.coverage".to_string(), coverage);
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }
}
