//! Load-and-match workflows shared by the subcommands.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use fieldmatch_catalog::{load_catalog_dir, load_profiles};
use fieldmatch_core::{
    BusinessContext, BusinessContextAnalyzer, KnowledgeBase, KnowledgeBaseStats, LoadReport,
    MatcherConfig, MatchingPipeline, SheetMatch,
};
use fieldmatch_model::{ColumnProfile, IntegrityReport};
use serde::Serialize;
use tracing::{info, info_span, warn};

/// Result of the `match` workflow.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub load: LoadReport,
    pub sheet: SheetMatch,
}

/// Result of the `inspect` workflow.
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutcome {
    pub load: LoadReport,
    pub stats: KnowledgeBaseStats,
    pub integrity: IntegrityReport,
}

/// Read the matcher configuration, falling back to defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<MatcherConfig> {
    match path {
        Some(path) => MatcherConfig::from_path(path)
            .with_context(|| format!("load matcher config {}", path.display())),
        None => Ok(MatcherConfig::default()),
    }
}

pub fn read_profiles(path: &Path) -> Result<Vec<ColumnProfile>> {
    let profiles = load_profiles(path).context("read column profiles")?;
    if profiles.is_empty() {
        bail!("no column profiles in {}", path.display());
    }
    Ok(profiles)
}

/// Build a pipeline and load the catalog directory into its store.
pub fn load_pipeline(catalog_dir: &Path, config: MatcherConfig) -> Result<(MatchingPipeline, LoadReport)> {
    let span = info_span!("load_catalog", dir = %catalog_dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let catalog = load_catalog_dir(catalog_dir).context("read catalog")?;
    let pipeline = MatchingPipeline::new(config).context("invalid matcher config")?;
    let report = pipeline
        .load_catalog(&catalog)
        .context("build knowledge base")?;
    info!(
        models = report.models,
        fields = report.fields,
        dropped = report.dropped.len(),
        duration_ms = start.elapsed().as_millis(),
        "knowledge base loaded"
    );
    Ok((pipeline, report))
}

/// Match every column in `profiles_path` against the catalog.
pub fn run_match(
    catalog_dir: &Path,
    profiles_path: &Path,
    config_path: Option<&Path>,
    models: &[String],
) -> Result<MatchOutcome> {
    let config = load_config(config_path)?;
    let profiles = read_profiles(profiles_path)?;
    let (pipeline, load) = load_pipeline(catalog_dir, config)?;

    let filter = model_filter(models);
    if let Some(filter) = &filter {
        let kb = pipeline.knowledge_base()?;
        for model in filter.iter().filter(|model| !kb.has_model(model)) {
            warn!(model = %model, "model filter names a model absent from the catalog");
        }
    }
    let sheet = pipeline
        .match_sheet(&profiles, filter.as_ref())
        .context("match sheet")?;
    Ok(MatchOutcome { load, sheet })
}

/// Recommend models for a sheet from its column names.
pub fn run_recommend(profiles_path: &Path) -> Result<BusinessContext> {
    let profiles = read_profiles(profiles_path)?;
    Ok(BusinessContextAnalyzer::new().analyze(&profiles))
}

/// Load a catalog and run the integrity sweep.
pub fn run_inspect(catalog_dir: &Path) -> Result<InspectOutcome> {
    let catalog = load_catalog_dir(catalog_dir).context("read catalog")?;
    let (kb, load) = KnowledgeBase::load(&catalog);
    if kb.is_empty() {
        bail!(
            "catalog resolved {} models and {} fields",
            kb.model_count(),
            kb.field_count()
        );
    }
    Ok(InspectOutcome {
        load,
        stats: kb.stats(),
        integrity: kb.validate(),
    })
}

/// Pretty JSON to `output`, or to stdout without a path.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize result")?;
    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n")).with_context(|| format!("write {}", path.display()))
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn model_filter(models: &[String]) -> Option<BTreeSet<String>> {
    let filter: BTreeSet<String> = models
        .iter()
        .map(|model| model.trim())
        .filter(|model| !model.is_empty())
        .map(str::to_string)
        .collect();
    (!filter.is_empty()).then_some(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_model_names_are_ignored() {
        assert_eq!(model_filter(&[" ".to_string()]), None);
        let filter = model_filter(&["res.partner".to_string(), " sale.order ".to_string()]);
        assert_eq!(
            filter.map(|set| set.into_iter().collect::<Vec<_>>()),
            Some(vec!["res.partner".to_string(), "sale.order".to_string()])
        );
    }
}
