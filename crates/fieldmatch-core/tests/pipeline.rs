mod common;

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use fieldmatch_core::strategies::ExactNameStrategy;
use fieldmatch_core::{
    MatchError, MatchStrategy, MatcherConfig, MatchingContext, MatchingPipeline, StrategyError,
    StrategyKind,
};
use fieldmatch_model::{ColumnProfile, ConfidenceTier, FieldMapping};

use common::{email_column, find, pipeline, pipeline_with, sample_kb, text_column};

fn partner_set() -> BTreeSet<String> {
    BTreeSet::from(["res.partner".to_string()])
}

#[test]
fn scenario_email_column_with_partner_candidates() {
    let pipeline = pipeline();
    let profile = email_column("Email");
    let candidates = partner_set();
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, Some(&candidates), 5)
        .expect("loaded pipeline");

    let best = result.best().expect("a mapping");
    assert_eq!(best.key().to_string(), "res.partner.email");
    assert_eq!(best.tier, Some(ConfidenceTier::High));
    assert!(best.strategies.iter().any(|s| s == "ExactName"));
    assert!(best.strategies.iter().any(|s| s == "Pattern"));
    assert!(best.provenance.starts_with("Combined["));
    assert_eq!(best.alternatives.len(), result.mappings.len() - 1);
}

#[test]
fn scenario_unknown_column_is_unmapped() {
    let pipeline = pipeline();
    let profile = text_column("XYZ_UNKNOWN_9912", &["qz81", "kk02", "rt77", "mn45", "pp19"]);
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 5)
        .expect("loaded pipeline");
    assert!(result.is_unmapped());
    assert_eq!(result.runs.len(), 8);
    assert_eq!(result.failed_strategies().count(), 0);
}

#[test]
fn scenario_first_and_last_name_derive_full_name() {
    let pipeline = pipeline();
    let profiles = vec![
        text_column("First Name", &["Ana", "Bo", "Cy"]),
        text_column("Last Name", &["Silva", "Berg", "Young"]),
        email_column("Email"),
    ];
    let sheet = pipeline.match_sheet(&profiles, None).expect("loaded pipeline");
    assert_eq!(sheet.columns.len(), 4);

    let derived = sheet.column("First Name + Last Name").expect("derived column");
    assert_eq!(derived.mappings.len(), 1);
    let mapping = &derived.mappings[0];
    assert_eq!(mapping.key().to_string(), "res.partner.name");
    assert_eq!(mapping.confidence, 0.85);
    assert_eq!(mapping.tier, Some(ConfidenceTier::High));
    assert_eq!(mapping.provenance, "Derived[FullName]");
    assert_eq!(
        mapping.transformation.as_deref(),
        Some("concat(First Name, ' ', Last Name)")
    );
}

#[test]
fn compound_name_prefers_suggested_model() {
    let pipeline = pipeline();
    let profile = text_column("customer_email", &["ana@example.com", "bo@example.org"]);
    let ranked = pipeline
        .rank_column(&profile, std::slice::from_ref(&profile), None, None)
        .expect("loaded pipeline");

    let partner = find(&ranked.candidates, "res.partner", "email").expect("partner email");
    let other = find(&ranked.candidates, "mailing.contact", "email").expect("mailing email");
    assert!(partner.confidence > other.confidence);
    assert_eq!(ranked.candidates[0].key().to_string(), "res.partner.email");
    assert_eq!(other.scores.get("model_priority"), Some(&0.3));
}

#[test]
fn match_column_is_deterministic() {
    let pipeline = pipeline();
    let profile = email_column("Email");
    let first = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 10)
        .expect("loaded pipeline");
    let second = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 10)
        .expect("loaded pipeline");
    assert_eq!(first.mappings, second.mappings);
}

#[test]
fn thresholds_hold_on_real_output() {
    let pipeline = pipeline();
    let thresholds = pipeline.config().thresholds();
    let profiles = vec![
        email_column("Email"),
        text_column("Phone", &["+1 555 0100", "+1 555 0101"]),
        text_column("Order Date", &["2024-01-02", "2024-02-03"]),
        text_column("Quantity", &["1", "2", "3"]),
    ];
    let sheet = pipeline.match_sheet(&profiles, None).expect("loaded pipeline");
    for column in &sheet.columns {
        assert!(column.mappings.len() <= pipeline.config().max_suggestions);
        for mapping in &column.mappings {
            assert!(mapping.confidence >= thresholds.medium);
            if mapping.confidence >= thresholds.high {
                assert_eq!(mapping.tier, Some(ConfidenceTier::High));
            }
        }
    }
}

#[test]
fn target_models_are_a_hard_restriction() {
    let pipeline = pipeline();
    let profile = email_column("Email");
    let targets = BTreeSet::from(["res.company".to_string()]);
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), Some(&targets), None, 10)
        .expect("loaded pipeline");
    assert!(!result.is_unmapped());
    assert!(result.mappings.iter().all(|m| m.target_model == "res.company"));
}

#[test]
fn model_filter_narrows_sheet_candidates() {
    let pipeline = pipeline();
    let profiles = vec![
        text_column("Name", &["Ana"]),
        email_column("Email"),
        text_column("City", &["Lisbon"]),
    ];
    let filter = partner_set();
    let sheet = pipeline
        .match_sheet(&profiles, Some(&filter))
        .expect("loaded pipeline");
    assert_eq!(sheet.candidate_models, vec!["res.partner".to_string()]);
    assert_eq!(sheet.recommended_models[0].model, "res.partner");
    let email = sheet.column("Email").and_then(|c| c.best()).expect("email mapping");
    assert_eq!(email.key().to_string(), "res.partner.email");
}

#[test]
fn sheet_summary_helpers() {
    let pipeline = pipeline();
    let profiles = vec![
        email_column("Email"),
        text_column("XYZ_UNKNOWN_9912", &["qz81", "kk02", "rt77"]),
    ];
    let sheet = pipeline.match_sheet(&profiles, None).expect("loaded pipeline");
    assert_eq!(sheet.unmapped_columns(), vec!["XYZ_UNKNOWN_9912"]);
    assert_eq!(sheet.best_mappings().len(), 1);
    assert_eq!(sheet.count_by_tier().get(&ConfidenceTier::High), Some(&1));
    assert!(sheet.mean_confidence() > 0.9);
    let by_column = sheet.by_column();
    assert_eq!(by_column.len(), 2);
    assert!(by_column["XYZ_UNKNOWN_9912"].is_empty());
    assert_eq!(sheet.sheet_name, "Contacts");
}

#[test]
fn parallel_and_sequential_sheets_agree() {
    let profiles = vec![
        email_column("Email"),
        text_column("Customer", &["Ana", "Bo"]),
        text_column("Order Reference", &["SO001", "SO002"]),
        text_column("Status", &["draft", "sale"]),
    ];
    let parallel = pipeline().match_sheet(&profiles, None).expect("parallel");
    let sequential = pipeline_with(MatcherConfig {
        parallel_columns: false,
        ..MatcherConfig::default()
    })
    .match_sheet(&profiles, None)
    .expect("sequential");
    let names = |sheet: &fieldmatch_core::SheetMatch| -> Vec<String> {
        sheet.columns.iter().map(|c| c.column.clone()).collect()
    };
    assert_eq!(names(&parallel), names(&sequential));
    for (a, b) in parallel.columns.iter().zip(&sequential.columns) {
        assert_eq!(a.mappings, b.mappings);
    }
}

struct Failing;

impl MatchStrategy for Failing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fuzzy
    }

    fn weight(&self) -> f64 {
        1.0
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        Err(StrategyError::InvalidProfile {
            column: ctx.column_name().to_string(),
            message: "broken".to_string(),
        })
    }
}

struct Panicking;

impl MatchStrategy for Panicking {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    fn weight(&self) -> f64 {
        1.0
    }

    fn match_column(&self, _ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        let empty: Vec<FieldMapping> = Vec::new();
        Ok(vec![empty[0].clone()])
    }
}

struct Slow;

impl MatchStrategy for Slow {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Contextual
    }

    fn weight(&self) -> f64 {
        1.0
    }

    fn match_column(&self, ctx: &MatchingContext<'_>) -> Result<Vec<FieldMapping>, StrategyError> {
        thread::sleep(Duration::from_millis(30));
        ExactNameStrategy::new(1.0).match_column(ctx)
    }
}

#[test]
fn failing_strategy_does_not_abort_the_column() {
    let pipeline = pipeline().with_strategies(vec![
        Box::new(ExactNameStrategy::new(1.0)),
        Box::new(Failing),
    ]);
    let profile = email_column("Email");
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 5)
        .expect("loaded pipeline");
    assert_eq!(result.mappings.len(), 3);
    let failed: Vec<&str> = result
        .failed_strategies()
        .map(|run| run.strategy.as_str())
        .collect();
    assert_eq!(failed, vec!["Fuzzy"]);
}

#[test]
fn panicking_strategy_counts_as_a_failed_run() {
    let pipeline = pipeline().with_strategies(vec![
        Box::new(ExactNameStrategy::new(1.0)),
        Box::new(Panicking),
    ]);
    let profile = email_column("Email");
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 5)
        .expect("loaded pipeline");
    assert_eq!(result.mappings.len(), 3);
    let failed: Vec<(&str, Option<&str>)> = result
        .failed_strategies()
        .map(|run| (run.strategy.as_str(), run.failure.as_deref()))
        .collect();
    assert_eq!(failed, vec![("Pattern", Some("panicked"))]);

    let profiles = vec![email_column("Email"), text_column("Name", &["Ada"])];
    let sheet = pipeline.match_sheet(&profiles, None).expect("sheet survives");
    assert_eq!(sheet.columns.len(), 2);
    assert!(sheet.columns.iter().all(|column| column.failed_strategies().count() == 1));
}

#[test]
fn over_budget_strategy_output_is_discarded() {
    let config = MatcherConfig {
        strategy_time_budget_ms: Some(1),
        ..MatcherConfig::default()
    };
    let pipeline = pipeline_with(config).with_strategies(vec![Box::new(Slow)]);
    let profile = email_column("Email");
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 5)
        .expect("loaded pipeline");
    assert!(result.is_unmapped());
    let failure = result.runs[0].failure.as_deref().unwrap_or_default();
    assert!(failure.contains("budget exceeded"));
}

#[test]
fn invalid_profile_only_silences_the_affected_strategy() {
    let pipeline = pipeline();
    let mut profile = email_column("Email");
    profile.uniqueness_ratio = f64::NAN;
    let result = pipeline
        .match_column(&profile, std::slice::from_ref(&profile), None, None, 5)
        .expect("loaded pipeline");
    assert!(!result.is_unmapped());
    let failed: Vec<&str> = result
        .failed_strategies()
        .map(|run| run.strategy.as_str())
        .collect();
    assert_eq!(failed, vec!["StatisticalSimilarity"]);
}

#[test]
fn unloaded_pipeline_is_a_caller_error() {
    let pipeline = MatchingPipeline::new(MatcherConfig::default()).expect("valid config");
    let profiles = vec![ColumnProfile::new("Email", "Sheet1")];
    assert!(matches!(
        pipeline.match_sheet(&profiles, None),
        Err(MatchError::NotLoaded)
    ));
    assert!(matches!(pipeline.knowledge_base(), Err(MatchError::NotLoaded)));
}

#[test]
fn pipeline_exposes_loaded_snapshot() {
    let pipeline = pipeline();
    let kb = pipeline.knowledge_base().expect("loaded");
    assert_eq!(kb.model_count(), sample_kb().model_count());
    assert_eq!(
        pipeline.strategy_names(),
        vec![
            "ExactName",
            "Label",
            "SelectionValue",
            "DataTypeCompatibility",
            "Pattern",
            "StatisticalSimilarity",
            "Contextual",
            "Fuzzy",
        ]
    );
}
