//! Pure pipeline stages: merge, model priority, rank and threshold.
//!
//! Each stage takes candidates by value and returns the new list, so every
//! stage can be tested on its own.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use fieldmatch_model::{ConfidenceTier, FieldKey, FieldMapping};
use serde::{Deserialize, Serialize};

use crate::text::mentions_any;

/// Bonus per extra agreeing strategy.
const AGREEMENT_STEP: f64 = 0.03;
const AGREEMENT_CAP: f64 = 0.1;

const COMPOUND_MATCH_FACTOR: f64 = 2.0;
const COMPOUND_MISS_FACTOR: f64 = 0.3;
const CANDIDATE_MATCH_FACTOR: f64 = 1.5;
const CANDIDATE_MISS_FACTOR: f64 = 0.5;

/// Model families that rarely own a generic column unless the column says so.
const DOMAIN_GUARDS: &[(&str, f64, &[&str])] = &[
    ("hr.", 0.2, &["employee"]),
    ("stock.", 0.4, &["stock", "inventory", "warehouse"]),
    ("project.", 0.4, &["project", "task", "milestone"]),
];

/// Confidence thresholds for tier assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Minimum score for high confidence.
    pub high: f64,
    /// Minimum score to be kept at all.
    pub medium: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

impl ConfidenceThresholds {
    /// Tier for a confidence, or `None` below the medium threshold.
    pub fn categorize(&self, confidence: f64) -> Option<ConfidenceTier> {
        if confidence >= self.high {
            Some(ConfidenceTier::High)
        } else if confidence >= self.medium {
            Some(ConfidenceTier::Medium)
        } else {
            None
        }
    }
}

/// Merged confidence of a group of votes for one field.
pub fn merged_confidence(confidences: &[f64]) -> f64 {
    let max = confidences.iter().copied().fold(0.0_f64, f64::max);
    let extra = confidences.len().saturating_sub(1) as f64;
    (max + (extra * AGREEMENT_STEP).min(AGREEMENT_CAP)).min(1.0)
}

/// Collapse candidates that target the same field.
///
/// The strongest member carries the group; sub-scores, strategies and
/// rationales of the others are folded into it. Output is in field-key order.
pub fn merge_candidates(candidates: Vec<FieldMapping>) -> Vec<FieldMapping> {
    let mut groups: BTreeMap<FieldKey, Vec<FieldMapping>> = BTreeMap::new();
    for candidate in candidates {
        groups.entry(candidate.key()).or_default().push(candidate);
    }
    groups.into_values().filter_map(merge_group).collect()
}

fn merge_group(group: Vec<FieldMapping>) -> Option<FieldMapping> {
    if group.len() < 2 {
        return group.into_iter().next();
    }
    let confidences: Vec<f64> = group.iter().map(|candidate| candidate.confidence).collect();
    let carrier_index = group
        .iter()
        .enumerate()
        .fold(0, |best, (index, candidate)| {
            if candidate.confidence > group[best].confidence {
                index
            } else {
                best
            }
        });

    let mut strategies: Vec<String> = Vec::new();
    let mut rationales: Vec<&str> = Vec::new();
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    let mut transformation = None;
    for candidate in &group {
        for strategy in &candidate.strategies {
            if !strategies.contains(strategy) {
                strategies.push(strategy.clone());
            }
        }
        if !candidate.rationale.is_empty() && !rationales.contains(&candidate.rationale.as_str()) {
            rationales.push(&candidate.rationale);
        }
        for (name, score) in &candidate.scores {
            let entry = scores.entry(name.clone()).or_insert(*score);
            *entry = entry.max(*score);
        }
        if transformation.is_none() {
            transformation.clone_from(&candidate.transformation);
        }
    }

    let rationale = rationales.join("; ");
    let mut merged = group.into_iter().nth(carrier_index)?;
    merged.confidence = merged_confidence(&confidences);
    merged.provenance = format!("Combined[{}]", strategies.join(", "));
    merged.strategies = strategies;
    merged.scores = scores;
    merged.rationale = rationale;
    merged.transformation = transformation;
    Some(merged)
}

/// Inputs of the model-priority stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityContext<'a> {
    pub column_name: &'a str,
    /// Model suggested by a compound column name, if that model is loaded.
    pub compound_model: Option<&'a str>,
    pub candidate_models: Option<&'a BTreeSet<String>>,
}

impl PriorityContext<'_> {
    /// Combined multiplier for a candidate on `model`.
    pub fn factor(&self, model: &str) -> f64 {
        let mut factor = match (self.compound_model, self.candidate_models) {
            (Some(suggested), _) if suggested == model => COMPOUND_MATCH_FACTOR,
            (Some(_), _) => COMPOUND_MISS_FACTOR,
            (None, Some(candidates)) if !candidates.is_empty() => {
                if candidates.contains(model) {
                    CANDIDATE_MATCH_FACTOR
                } else {
                    CANDIDATE_MISS_FACTOR
                }
            }
            _ => 1.0,
        };
        for (prefix, guard, waivers) in DOMAIN_GUARDS {
            if model.starts_with(prefix) && !mentions_any(self.column_name, waivers) {
                factor *= guard;
            }
        }
        factor
    }
}

/// Scale each candidate by its model's priority factor, clamped to 1.0.
pub fn apply_model_priority(
    candidates: Vec<FieldMapping>,
    ctx: &PriorityContext<'_>,
) -> Vec<FieldMapping> {
    candidates
        .into_iter()
        .map(|mut candidate| {
            let factor = ctx.factor(&candidate.target_model);
            if (factor - 1.0).abs() > f64::EPSILON {
                candidate.confidence = (candidate.confidence * factor).clamp(0.0, 1.0);
                candidate.scores.insert("model_priority".to_string(), factor);
                candidate.push_rationale(&format!(
                    "model priority x{factor:.2} for {}",
                    candidate.target_model
                ));
            }
            candidate
        })
        .collect()
}

/// Order for ranked output: confidence, then agreeing strategies, then name.
pub fn compare_ranked(a: &FieldMapping, b: &FieldMapping) -> Ordering {
    b.confidence
        .partial_cmp(&a.confidence)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.strategy_count().cmp(&a.strategy_count()))
        .then_with(|| a.target_field.cmp(&b.target_field))
        .then_with(|| a.target_model.cmp(&b.target_model))
}

pub fn rank_candidates(mut candidates: Vec<FieldMapping>) -> Vec<FieldMapping> {
    candidates.sort_by(compare_ranked);
    candidates
}

/// Keep candidates at or above the medium threshold, tag their tier and
/// attach the runners-up to the best one.
///
/// Expects ranked input. Returns at most `max_results` mappings.
pub fn apply_thresholds(
    ranked: Vec<FieldMapping>,
    thresholds: &ConfidenceThresholds,
    max_results: usize,
) -> Vec<FieldMapping> {
    let mut kept: Vec<FieldMapping> = ranked
        .into_iter()
        .filter_map(|mut candidate| {
            candidate.tier = Some(thresholds.categorize(candidate.confidence)?);
            Some(candidate)
        })
        .take(max_results)
        .collect();
    if kept.len() > 1 {
        let alternatives = kept[1..].to_vec();
        kept[0].alternatives = alternatives;
    }
    kept
}
