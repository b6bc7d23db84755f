use fieldmatch_model::FieldMapping;

use super::{MatchStrategy, StrategyKind, check_ratio, field_tokens, weighted_candidate};
use crate::context::MatchingContext;
use crate::error::StrategyError;
use crate::text::tokens_mention;

const MIN_PATTERN_RATIO: f64 = 0.70;
const PATTERN_FACTOR: f64 = 0.8;
const TYPE_BONUS: f64 = 1.2;

/// Detected value patterns (email, phone, currency...) point at fields
/// whose name or label mentions the pattern.
#[derive(Debug, Clone)]
pub struct PatternStrategy {
    weight: f64,
}

impl PatternStrategy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MatchStrategy for PatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let mut strong = Vec::new();
        for (pattern, ratio) in &ctx.profile.patterns {
            let ratio = check_ratio(ctx, &format!("{pattern} pattern ratio"), *ratio)?;
            if ratio >= MIN_PATTERN_RATIO {
                strong.push((*pattern, ratio));
            }
        }
        if strong.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for field in ctx.candidate_fields() {
            let tokens = field_tokens(field);
            let best = strong
                .iter()
                .filter(|(pattern, _)| tokens_mention(&tokens, pattern.field_keywords()))
                .map(|(pattern, ratio)| {
                    let bonus = if pattern.expected_field_types().contains(&field.field_type) {
                        TYPE_BONUS
                    } else {
                        1.0
                    };
                    (*pattern, (ratio * PATTERN_FACTOR * bonus).min(1.0))
                })
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
            let Some((pattern, raw)) = best else { continue };
            candidates.extend(weighted_candidate(
                ctx,
                self.kind(),
                self.weight,
                &field.key(),
                raw,
                format!(
                    "{:.0}% of values look like {pattern}",
                    ctx.profile.pattern_ratio(pattern) * 100.0
                ),
            ));
        }
        Ok(candidates)
    }
}
