mod common;

use fieldmatch_core::pipeline::{
    ConfidenceThresholds, apply_thresholds, merge_candidates, merged_confidence, rank_candidates,
};
use fieldmatch_core::strategies::ExactNameStrategy;
use fieldmatch_core::{MatchStrategy, MatchingContext};
use fieldmatch_model::{ConfidenceTier, FieldKey, FieldMapping};
use proptest::prelude::*;

use common::{sample_kb, text_column};

const STRATEGIES: [&str; 8] = [
    "ExactName",
    "Label",
    "SelectionValue",
    "DataTypeCompatibility",
    "Pattern",
    "StatisticalSimilarity",
    "Contextual",
    "Fuzzy",
];

const FIELDS: [(&str, &str); 6] = [
    ("res.partner", "email"),
    ("res.partner", "name"),
    ("res.company", "email"),
    ("sale.order", "state"),
    ("product.product", "default_code"),
    ("hr.employee", "work_email"),
];

proptest! {
    #[test]
    fn merge_law(confidences in prop::collection::vec(0.0f64..=1.0, 2..=8)) {
        let key = FieldKey::new("res.partner", "email");
        let candidates: Vec<FieldMapping> = confidences
            .iter()
            .zip(STRATEGIES)
            .map(|(confidence, strategy)| {
                FieldMapping::new("Email", &key, *confidence, strategy, strategy)
            })
            .collect();
        let max = confidences.iter().copied().fold(0.0f64, f64::max);
        let k = confidences.len() as f64;
        let expected = (max + ((k - 1.0) * 0.03).min(0.1)).min(1.0);

        let merged = merge_candidates(candidates);
        prop_assert_eq!(merged.len(), 1);
        prop_assert!((merged[0].confidence - expected).abs() < 1e-12);
        prop_assert!(merged[0].confidence >= max);
        prop_assert!(merged[0].confidence <= 1.0);
        prop_assert_eq!(merged[0].strategy_count(), confidences.len());
        prop_assert!((merged_confidence(&confidences) - expected).abs() < 1e-12);
    }

    #[test]
    fn threshold_law(
        votes in prop::collection::vec((0usize..FIELDS.len(), 0.0f64..=1.0), 0..24),
        high in 0.5f64..=0.9,
        medium in 0.1f64..=0.5,
        max_results in 1usize..=10,
    ) {
        let thresholds = ConfidenceThresholds { high, medium };
        let candidates: Vec<FieldMapping> = votes
            .iter()
            .map(|(index, confidence)| {
                let (model, field) = FIELDS[*index];
                FieldMapping::new("Col", &FieldKey::new(model, field), *confidence, "Fuzzy", "")
            })
            .collect();
        let kept = apply_thresholds(rank_candidates(merge_candidates(candidates)), &thresholds, max_results);

        prop_assert!(kept.len() <= max_results);
        for pair in kept.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
        for mapping in &kept {
            prop_assert!(mapping.confidence >= medium);
            if mapping.confidence >= high {
                prop_assert_eq!(mapping.tier, Some(ConfidenceTier::High));
            } else {
                prop_assert_eq!(mapping.tier, Some(ConfidenceTier::Medium));
            }
        }
    }

    #[test]
    fn exact_name_confidence_equals_weight(weight in 0.01f64..=1.0) {
        let kb = sample_kb();
        let profile = text_column("Email", &["a@example.com"]);
        let ctx = MatchingContext::new(&kb, &profile, std::slice::from_ref(&profile));
        let mappings = ExactNameStrategy::new(weight).match_column(&ctx).expect("runs");
        prop_assert_eq!(mappings.len(), 3);
        for mapping in &mappings {
            prop_assert_eq!(mapping.confidence, weight);
        }
    }
}
