//! Column profile contract.
//!
//! Profiles are produced by an external profiler and consumed read-only by
//! the matching engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::schema::FieldType;

/// Scalar type detected for a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
    Mixed,
    Empty,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::Boolean => "boolean",
            ScalarType::Date => "date",
            ScalarType::Datetime => "datetime",
            ScalarType::Mixed => "mixed",
            ScalarType::Empty => "empty",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Float)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Ok(ScalarType::String),
            "integer" | "int" => Ok(ScalarType::Integer),
            "float" | "number" | "decimal" => Ok(ScalarType::Float),
            "boolean" | "bool" => Ok(ScalarType::Boolean),
            "date" => Ok(ScalarType::Date),
            "datetime" | "timestamp" => Ok(ScalarType::Datetime),
            "mixed" => Ok(ScalarType::Mixed),
            "empty" | "null" => Ok(ScalarType::Empty),
            other => Err(ModelError::UnknownScalarType(other.to_string())),
        }
    }
}

/// Value shapes a profiler can detect, keyed by the fraction of values matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuePattern {
    Email,
    Phone,
    Url,
    Currency,
    Date,
    Percentage,
    Boolean,
}

impl ValuePattern {
    pub const ALL: [ValuePattern; 7] = [
        ValuePattern::Email,
        ValuePattern::Phone,
        ValuePattern::Url,
        ValuePattern::Currency,
        ValuePattern::Date,
        ValuePattern::Percentage,
        ValuePattern::Boolean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValuePattern::Email => "email",
            ValuePattern::Phone => "phone",
            ValuePattern::Url => "url",
            ValuePattern::Currency => "currency",
            ValuePattern::Date => "date",
            ValuePattern::Percentage => "percentage",
            ValuePattern::Boolean => "boolean",
        }
    }

    /// Name fragments of target fields that usually hold this kind of value.
    pub fn field_keywords(&self) -> &'static [&'static str] {
        match self {
            ValuePattern::Email => &["email", "mail"],
            ValuePattern::Phone => &["phone", "mobile", "tel", "fax"],
            ValuePattern::Url => &["website", "url", "link", "site"],
            ValuePattern::Currency => &[
                "amount", "price", "cost", "total", "balance", "revenue", "salary", "wage",
            ],
            ValuePattern::Date => &["date", "deadline", "day", "birthday"],
            ValuePattern::Percentage => &["percent", "rate", "ratio", "discount", "probability"],
            ValuePattern::Boolean => &["active", "is", "has", "enabled", "flag"],
        }
    }

    /// Field types that naturally store this kind of value.
    pub fn expected_field_types(&self) -> &'static [FieldType] {
        match self {
            ValuePattern::Email | ValuePattern::Phone | ValuePattern::Url => {
                &[FieldType::Char, FieldType::Text]
            }
            ValuePattern::Currency => &[FieldType::Monetary, FieldType::Float],
            ValuePattern::Date => &[FieldType::Date, FieldType::Datetime],
            ValuePattern::Percentage => &[FieldType::Float, FieldType::Integer],
            ValuePattern::Boolean => &[FieldType::Boolean],
        }
    }
}

impl fmt::Display for ValuePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValuePattern {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ValuePattern::ALL
            .into_iter()
            .find(|pattern| pattern.as_str() == lowered)
            .ok_or(ModelError::UnknownPattern(lowered))
    }
}

/// Statistical and lexical description of one source column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnProfile {
    pub name: String,
    pub sheet_name: String,
    pub detected_type: ScalarType,
    pub sample_values: Vec<String>,
    pub row_count: usize,
    pub non_null_count: usize,
    pub unique_count: usize,
    /// Percentage of null cells (0.0 to 100.0).
    pub null_percentage: f64,
    /// Ratio of distinct values to non-null values (0.0 to 1.0).
    pub uniqueness_ratio: f64,
    /// Fraction of values matching each detected pattern (0.0 to 1.0).
    pub patterns: BTreeMap<ValuePattern, f64>,
    pub value_frequencies: BTreeMap<String, usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

const SAMPLE_LIMIT: usize = 20;

impl ColumnProfile {
    pub fn new(name: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheet_name: sheet_name.into(),
            ..Self::default()
        }
    }

    /// Build a profile with basic counts derived from raw cell values.
    ///
    /// Empty strings count as nulls. Pattern ratios are not detected here and
    /// can be attached with [`ColumnProfile::with_pattern`].
    pub fn from_values(
        name: impl Into<String>,
        sheet_name: impl Into<String>,
        values: &[&str],
    ) -> Self {
        let mut profile = Self::new(name, sheet_name);
        let non_null: Vec<&str> = values
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect();
        let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
        for value in &non_null {
            *frequencies.entry((*value).to_string()).or_insert(0) += 1;
        }
        let numbers: Vec<f64> = non_null
            .iter()
            .filter_map(|value| value.parse::<f64>().ok())
            .collect();
        let all_numeric = !non_null.is_empty() && numbers.len() == non_null.len();

        profile.row_count = values.len();
        profile.non_null_count = non_null.len();
        profile.unique_count = frequencies.len();
        profile.null_percentage = if values.is_empty() {
            0.0
        } else {
            (values.len() - non_null.len()) as f64 * 100.0 / values.len() as f64
        };
        profile.uniqueness_ratio = if non_null.is_empty() {
            0.0
        } else {
            frequencies.len() as f64 / non_null.len() as f64
        };
        profile.detected_type = if non_null.is_empty() {
            ScalarType::Empty
        } else if all_numeric && non_null.iter().all(|value| value.parse::<i64>().is_ok()) {
            ScalarType::Integer
        } else if all_numeric {
            ScalarType::Float
        } else {
            ScalarType::String
        };
        if all_numeric {
            profile.min_value = numbers.iter().copied().reduce(f64::min);
            profile.max_value = numbers.iter().copied().reduce(f64::max);
        }
        profile.sample_values = non_null
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|value| (*value).to_string())
            .collect();
        profile.value_frequencies = frequencies;
        profile
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: ValuePattern, ratio: f64) -> Self {
        self.patterns.insert(pattern, ratio);
        self
    }

    #[must_use]
    pub fn with_detected_type(mut self, detected_type: ScalarType) -> Self {
        self.detected_type = detected_type;
        self
    }

    pub fn pattern_ratio(&self, pattern: ValuePattern) -> f64 {
        self.patterns.get(&pattern).copied().unwrap_or(0.0)
    }

    /// Distinct non-empty values, lowercased, from frequencies or samples.
    pub fn distinct_values(&self) -> BTreeSet<String> {
        let source: Box<dyn Iterator<Item = &String>> = if self.value_frequencies.is_empty() {
            Box::new(self.sample_values.iter())
        } else {
            Box::new(self.value_frequencies.keys())
        };
        source
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .collect()
    }
}
