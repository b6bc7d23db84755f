pub mod catalog;
pub mod error;
pub mod integrity;
pub mod lookup;
pub mod mapping;
pub mod profile;
pub mod schema;

pub use catalog::{
    Catalog, CatalogConstraint, CatalogField, CatalogModel, CatalogRelation, CatalogSelection,
};
pub use error::{ModelError, Result};
pub use integrity::{IntegrityIssue, IntegrityReport, IssueSeverity};
pub use lookup::CaseInsensitiveMap;
pub use mapping::{ConfidenceTier, FieldMapping};
pub use profile::{ColumnProfile, ScalarType, ValuePattern};
pub use schema::{
    ConstraintDefinition, ConstraintKind, FieldDefinition, FieldKey, FieldType, ModelDefinition,
    RelationDefinition, SelectionOption,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_report_counts() {
        let report = IntegrityReport {
            issues: vec![
                IntegrityIssue {
                    severity: IssueSeverity::Error,
                    model: "sale.order".to_string(),
                    field: Some("partner_id".to_string()),
                    message: "field references unknown model".to_string(),
                },
                IntegrityIssue {
                    severity: IssueSeverity::Warning,
                    model: "res.partner".to_string(),
                    field: Some("type".to_string()),
                    message: "selection field has no options".to_string(),
                },
            ],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn mapping_serializes() {
        let key = FieldKey::new("res.partner", "email");
        let mapping = FieldMapping::new("Email", &key, 0.9, "ExactName", "exact name");
        let json = serde_json::to_string(&mapping).expect("serialize mapping");
        let round: FieldMapping = serde_json::from_str(&json).expect("deserialize mapping");
        assert_eq!(round.key(), key);
        assert_eq!(round.strategy_count(), 1);
    }
}
