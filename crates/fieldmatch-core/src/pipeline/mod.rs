//! Strategy execution, merging, ranking and thresholding.

mod full_name;
mod report;
mod stages;

use std::collections::BTreeSet;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fieldmatch_model::{Catalog, ColumnProfile, FieldMapping};
use rayon::prelude::*;
use tracing::{debug, debug_span, info, info_span, warn};

pub use report::{ColumnMatch, RankedColumn, SheetMatch, StrategyRun};
pub use stages::{
    ConfidenceThresholds, PriorityContext, apply_model_priority, apply_thresholds, compare_ranked,
    merge_candidates, merged_confidence, rank_candidates,
};

use crate::analysis::{BusinessContext, BusinessContextAnalyzer, parse_compound_name};
use crate::config::MatcherConfig;
use crate::context::MatchingContext;
use crate::error::{ConfigError, KnowledgeBaseError, Result};
use crate::knowledge_base::{KnowledgeBase, LoadReport};
use crate::store::SchemaStore;
use crate::strategies::{MatchStrategy, default_strategies};

/// Runs the strategy family over columns and turns raw votes into ranked,
/// thresholded mappings.
///
/// The pipeline owns its configuration, its strategies and the schema
/// store. It takes `&self` everywhere, so one instance can serve
/// concurrent callers.
pub struct MatchingPipeline {
    config: MatcherConfig,
    store: SchemaStore,
    strategies: Vec<Box<dyn MatchStrategy>>,
    analyzer: BusinessContextAnalyzer,
}

impl fmt::Debug for MatchingPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingPipeline")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl MatchingPipeline {
    /// Create an unloaded pipeline with the eight default strategies.
    pub fn new(config: MatcherConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let strategies = default_strategies(&config);
        Ok(Self {
            config,
            store: SchemaStore::new(),
            strategies,
            analyzer: BusinessContextAnalyzer::new(),
        })
    }

    /// Create a pipeline that already holds `knowledge_base`.
    pub fn with_knowledge_base(config: MatcherConfig, knowledge_base: KnowledgeBase) -> Result<Self> {
        let pipeline = Self::new(config)?;
        pipeline.store.install(knowledge_base)?;
        Ok(pipeline)
    }

    /// Replace the registered strategies.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: BusinessContextAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Resolve `catalog` and swap it in as the current schema.
    pub fn load_catalog(&self, catalog: &Catalog) -> std::result::Result<LoadReport, KnowledgeBaseError> {
        self.store.reload(catalog)
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// The current schema snapshot; fails before the first load.
    pub fn knowledge_base(&self) -> Result<Arc<KnowledgeBase>> {
        self.store.snapshot()
    }

    /// Registered strategy names in run order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    /// Domains and models implied by the sheet's column names.
    pub fn recommend_models(&self, profiles: &[ColumnProfile]) -> BusinessContext {
        self.analyzer.analyze(profiles)
    }

    /// Merged, priority-adjusted and ranked candidates for one column, before
    /// thresholding.
    pub fn rank_column(
        &self,
        profile: &ColumnProfile,
        all_profiles: &[ColumnProfile],
        target_models: Option<&BTreeSet<String>>,
        candidate_models: Option<&BTreeSet<String>>,
    ) -> Result<RankedColumn> {
        let kb = self.store.snapshot()?;
        Ok(self.rank_with(&kb, profile, all_profiles, target_models, candidate_models))
    }

    /// Mappings for one column, best first, at most `max_results` long.
    pub fn match_column(
        &self,
        profile: &ColumnProfile,
        all_profiles: &[ColumnProfile],
        target_models: Option<&BTreeSet<String>>,
        candidate_models: Option<&BTreeSet<String>>,
        max_results: usize,
    ) -> Result<ColumnMatch> {
        let kb = self.store.snapshot()?;
        Ok(self.match_with(
            &kb,
            profile,
            all_profiles,
            target_models,
            candidate_models,
            max_results,
        ))
    }

    /// Mappings for every column of a sheet.
    ///
    /// The sheet's column names first select a candidate-model set, which is
    /// intersected with `model_filter` when one is given; the filter alone is
    /// used if the intersection is empty. A derived full-name column is
    /// appended when the sheet splits first and last names.
    pub fn match_sheet(
        &self,
        profiles: &[ColumnProfile],
        model_filter: Option<&BTreeSet<String>>,
    ) -> Result<SheetMatch> {
        let kb = self.store.snapshot()?;
        let sheet_name = profiles
            .first()
            .map(|profile| profile.sheet_name.clone())
            .unwrap_or_default();
        let span = info_span!("match_sheet", sheet = %sheet_name, columns = profiles.len());
        let _guard = span.enter();

        let context = self.analyzer.analyze(profiles);
        let recommended: BTreeSet<String> = context
            .model_names()
            .filter(|model| kb.has_model(model))
            .map(str::to_string)
            .collect();
        let candidates = candidate_set(recommended, model_filter);
        let candidate_ref = (!candidates.is_empty()).then_some(&candidates);
        debug!(candidate_models = candidates.len(), "candidate model set derived");

        let max_results = self.config.max_suggestions;
        let match_one = |profile: &ColumnProfile| {
            let _column = debug_span!(parent: &span, "match_column", column = %profile.name).entered();
            self.match_with(&kb, profile, profiles, None, candidate_ref, max_results)
        };
        let mut columns: Vec<ColumnMatch> = if self.config.parallel_columns {
            profiles.par_iter().map(match_one).collect()
        } else {
            profiles.iter().map(match_one).collect()
        };
        if let Some(derived) = full_name::derive_full_name(&kb, profiles, &self.config.thresholds()) {
            debug!(column = %derived.column, "derived full-name column");
            columns.push(derived);
        }

        let sheet = SheetMatch {
            sheet_name,
            domains: context.domains,
            recommended_models: context.models,
            candidate_models: candidates.into_iter().collect(),
            columns,
        };
        info!(
            columns = sheet.columns.len(),
            unmapped = sheet.unmapped_columns().len(),
            mean_confidence = sheet.mean_confidence(),
            "sheet matched"
        );
        Ok(sheet)
    }

    fn match_with(
        &self,
        kb: &KnowledgeBase,
        profile: &ColumnProfile,
        all_profiles: &[ColumnProfile],
        target_models: Option<&BTreeSet<String>>,
        candidate_models: Option<&BTreeSet<String>>,
        max_results: usize,
    ) -> ColumnMatch {
        let ranked = self.rank_with(kb, profile, all_profiles, target_models, candidate_models);
        let mappings = apply_thresholds(ranked.candidates, &self.config.thresholds(), max_results);
        debug!(
            column = %profile.name,
            mappings = mappings.len(),
            best = mappings.first().map(|m| m.confidence).unwrap_or_default(),
            "column matched"
        );
        ColumnMatch {
            column: ranked.column,
            mappings,
            runs: ranked.runs,
        }
    }

    fn rank_with(
        &self,
        kb: &KnowledgeBase,
        profile: &ColumnProfile,
        all_profiles: &[ColumnProfile],
        target_models: Option<&BTreeSet<String>>,
        candidate_models: Option<&BTreeSet<String>>,
    ) -> RankedColumn {
        let ctx = MatchingContext::new(kb, profile, all_profiles)
            .with_target_models(target_models)
            .with_candidate_models(candidate_models);
        let (raw, runs) = self.run_strategies(&ctx);

        let merged = merge_candidates(raw);
        let compound = parse_compound_name(&profile.name);
        let compound_model = compound
            .suggested_model
            .as_deref()
            .filter(|model| kb.has_model(model));
        let priority = PriorityContext {
            column_name: &profile.name,
            compound_model,
            candidate_models: ctx.candidate_models,
        };
        let adjusted = apply_model_priority(merged, &priority);
        RankedColumn {
            column: profile.name.clone(),
            candidates: rank_candidates(adjusted),
            runs,
        }
    }

    fn run_strategies(&self, ctx: &MatchingContext<'_>) -> (Vec<FieldMapping>, Vec<StrategyRun>) {
        let budget = self.config.strategy_time_budget_ms.map(Duration::from_millis);
        let mut candidates = Vec::new();
        let mut runs = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let started = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| strategy.match_column(ctx)));
            let elapsed = started.elapsed();
            let (produced, failure) = match outcome {
                Ok(Ok(_)) if budget.is_some_and(|limit| elapsed > limit) => {
                    (Vec::new(), Some(format!("budget exceeded after {} ms", elapsed.as_millis())))
                }
                Ok(Ok(produced)) => (produced, None),
                Ok(Err(error)) => (Vec::new(), Some(error.to_string())),
                Err(_) => (Vec::new(), Some("panicked".to_string())),
            };
            if let Some(reason) = &failure {
                warn!(
                    strategy = strategy.name(),
                    column = %ctx.column_name(),
                    reason = %reason,
                    "strategy produced no candidates"
                );
            } else {
                debug!(
                    strategy = strategy.name(),
                    candidates = produced.len(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "strategy finished"
                );
            }
            runs.push(StrategyRun {
                strategy: strategy.name().to_string(),
                candidates: produced.len(),
                elapsed,
                failure,
            });
            candidates.extend(produced);
        }
        (candidates, runs)
    }
}

/// Intersect the recommended models with an explicit filter.
fn candidate_set(
    recommended: BTreeSet<String>,
    model_filter: Option<&BTreeSet<String>>,
) -> BTreeSet<String> {
    match model_filter.filter(|filter| !filter.is_empty()) {
        None => recommended,
        Some(filter) => {
            let intersection: BTreeSet<String> =
                recommended.intersection(filter).cloned().collect();
            if intersection.is_empty() {
                filter.clone()
            } else {
                intersection
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    #[test]
    fn filter_narrows_recommendations() {
        let recommended = BTreeSet::from(["res.partner".to_string(), "sale.order".to_string()]);
        let filter = BTreeSet::from(["sale.order".to_string(), "account.move".to_string()]);
        assert_eq!(
            candidate_set(recommended.clone(), Some(&filter)),
            BTreeSet::from(["sale.order".to_string()])
        );
        assert_eq!(candidate_set(BTreeSet::new(), Some(&filter)), filter);
        assert_eq!(candidate_set(recommended.clone(), None), recommended);
    }

    #[test]
    fn unloaded_pipeline_refuses_to_match() {
        let pipeline = MatchingPipeline::new(MatcherConfig::default()).expect("valid config");
        let profile = ColumnProfile::new("Email", "Sheet1");
        let result = pipeline.match_column(&profile, std::slice::from_ref(&profile), None, None, 5);
        assert!(matches!(result, Err(MatchError::NotLoaded)));
        assert_eq!(pipeline.strategy_names().len(), 8);
    }
}
