//! Matcher configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pipeline::ConfidenceThresholds;
use crate::strategies::StrategyKind;

/// Strategy weights, tier thresholds and pipeline limits.
///
/// Every key is optional in the TOML form; missing keys take the defaults
/// below.
///
/// ```toml
/// fuzzy_match_weight = 0.5
/// high_confidence_threshold = 0.8
/// max_suggestions = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    pub exact_match_weight: f64,
    pub label_match_weight: f64,
    pub selection_value_weight: f64,
    pub data_type_weight: f64,
    pub pattern_match_weight: f64,
    pub statistical_weight: f64,
    pub contextual_weight: f64,
    pub fuzzy_match_weight: f64,
    pub high_confidence_threshold: f64,
    pub medium_confidence_threshold: f64,
    /// Upper bound on mappings returned per column.
    pub max_suggestions: usize,
    /// Per-strategy wall-clock budget; output of a slower run is discarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_time_budget_ms: Option<u64>,
    /// Match the columns of a sheet on the rayon pool.
    pub parallel_columns: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            exact_match_weight: 1.0,
            label_match_weight: 0.95,
            selection_value_weight: 0.90,
            data_type_weight: 0.70,
            pattern_match_weight: 0.75,
            statistical_weight: 0.60,
            contextual_weight: 0.80,
            fuzzy_match_weight: 0.65,
            high_confidence_threshold: 0.7,
            medium_confidence_threshold: 0.4,
            max_suggestions: 10,
            strategy_time_budget_ms: None,
            parallel_columns: true,
        }
    }
}

impl MatcherConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Weights must be finite and non-negative; thresholds must satisfy
    /// `0 <= medium <= high <= 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in StrategyKind::ALL {
            let weight = self.weight(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "weight for {} must be a non-negative number, got {weight}",
                    kind.as_str()
                )));
            }
        }
        let (high, medium) = (self.high_confidence_threshold, self.medium_confidence_threshold);
        if !(0.0..=1.0).contains(&medium) || !(0.0..=1.0).contains(&high) {
            return Err(invalid(format!(
                "confidence thresholds must lie in [0, 1], got medium {medium} and high {high}"
            )));
        }
        if medium > high {
            return Err(invalid(format!(
                "medium threshold {medium} exceeds high threshold {high}"
            )));
        }
        if self.max_suggestions == 0 {
            return Err(invalid("max_suggestions must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn weight(&self, kind: StrategyKind) -> f64 {
        match kind {
            StrategyKind::ExactName => self.exact_match_weight,
            StrategyKind::Label => self.label_match_weight,
            StrategyKind::SelectionValue => self.selection_value_weight,
            StrategyKind::DataTypeCompatibility => self.data_type_weight,
            StrategyKind::Pattern => self.pattern_match_weight,
            StrategyKind::StatisticalSimilarity => self.statistical_weight,
            StrategyKind::Contextual => self.contextual_weight,
            StrategyKind::Fuzzy => self.fuzzy_match_weight,
        }
    }

    pub fn thresholds(&self) -> ConfidenceThresholds {
        ConfidenceThresholds {
            high: self.high_confidence_threshold,
            medium: self.medium_confidence_threshold,
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weight(StrategyKind::Label), 0.95);
        assert_eq!(config.thresholds().medium, 0.4);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = MatcherConfig::from_toml_str("fuzzy_match_weight = 0.5\nmax_suggestions = 3\n")
            .expect("parse");
        assert_eq!(config.fuzzy_match_weight, 0.5);
        assert_eq!(config.max_suggestions, 3);
        assert_eq!(config.exact_match_weight, 1.0);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_thresholds() {
        assert!(matches!(
            MatcherConfig::from_toml_str("fuzzy_weight = 0.5"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            MatcherConfig::from_toml_str(
                "medium_confidence_threshold = 0.9\nhigh_confidence_threshold = 0.5"
            ),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            MatcherConfig::from_toml_str("label_match_weight = -1.0"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn zero_weight_is_allowed() {
        let config = MatcherConfig {
            fuzzy_match_weight: 0.0,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
