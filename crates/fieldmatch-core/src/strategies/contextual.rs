use std::collections::{BTreeMap, BTreeSet};

use fieldmatch_model::FieldMapping;

use super::{MatchStrategy, StrategyKind, field_tokens, keep_best, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::knowledge_base::KnowledgeBase;
use crate::text::{name_tokens, normalize_label, normalize_name, token_jaccard};

const NAME_HIT_POINTS: u32 = 2;
const LABEL_HIT_POINTS: u32 = 1;
const MIN_VOTES: f64 = 3.0;
const VOTE_SHARE: f64 = 0.2;
const MIN_SIMILARITY: f64 = 0.5;
const CONTEXT_FACTOR: f64 = 0.85;
const MAX_CANDIDATES: usize = 10;

/// Sibling columns vote for the models a sheet most likely targets; this
/// column is then matched against fields of those models and their direct
/// neighbours.
#[derive(Debug, Clone)]
pub struct ContextualStrategy {
    weight: f64,
}

impl ContextualStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

/// Points per model from exact name hits (2) and label hits (1) across the sheet.
pub(crate) fn model_votes(
    kb: &KnowledgeBase,
    column_names: impl IntoIterator<Item = impl AsRef<str>>,
) -> BTreeMap<String, u32> {
    let mut votes = BTreeMap::new();
    for name in column_names {
        let name = name.as_ref();
        let name_models: BTreeSet<&str> = kb
            .by_field_name(&normalize_name(name))
            .iter()
            .map(|key| key.model.as_str())
            .collect();
        let label_models: BTreeSet<&str> = kb
            .by_label(&normalize_label(name))
            .iter()
            .map(|key| key.model.as_str())
            .collect();
        for model in &name_models {
            *votes.entry((*model).to_string()).or_insert(0) += NAME_HIT_POINTS;
        }
        for model in label_models.difference(&name_models) {
            *votes.entry((*model).to_string()).or_insert(0) += LABEL_HIT_POINTS;
        }
    }
    votes
}

impl MatchStrategy for ContextualStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Contextual
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let kb = ctx.knowledge_base;
        let column_tokens = name_tokens(ctx.column_name());
        if column_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let qualify = MIN_VOTES.max(VOTE_SHARE * ctx.all_profiles.len() as f64);
        let votes = model_votes(kb, ctx.all_profiles.iter().map(|profile| &profile.name));
        let likely: BTreeMap<&str, u32> = votes
            .iter()
            .filter(|(_, points)| f64::from(**points) > qualify)
            .map(|(model, points)| (model.as_str(), *points))
            .collect();
        if likely.is_empty() {
            return Ok(Vec::new());
        }

        let mut scope: BTreeMap<String, String> = BTreeMap::new();
        for (model, points) in &likely {
            scope.insert(
                (*model).to_string(),
                format!("sheet columns point at {model} ({points} votes)"),
            );
        }
        for model in likely.keys() {
            for related in kb.related_models(model, 1) {
                scope
                    .entry(related)
                    .or_insert_with(|| format!("related to likely model {model}"));
            }
        }

        let mut candidates = Vec::new();
        for (model, reason) in &scope {
            if !ctx.allows_model(model) {
                continue;
            }
            for field in kb.fields_of_model(model) {
                let similarity = token_jaccard(&column_tokens, &field_tokens(field));
                if similarity < MIN_SIMILARITY {
                    continue;
                }
                candidates.extend(weighted_candidate(
                    ctx,
                    self.kind(),
                    self.weight,
                    &field.key(),
                    similarity * CONTEXT_FACTOR,
                    reason.clone(),
                ));
            }
        }
        Ok(keep_best(candidates, MAX_CANDIDATES))
    }
}
