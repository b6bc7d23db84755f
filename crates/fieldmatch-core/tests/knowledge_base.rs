mod common;

use fieldmatch_core::{CatalogItemKind, KnowledgeBase};
use fieldmatch_model::{Catalog, ConstraintKind, FieldKey, FieldType, IssueSeverity};

use common::{sample_catalog, sample_kb};

#[test]
fn load_resolves_descriptions_and_reports_drops() {
    let (kb, report) = KnowledgeBase::load(&sample_catalog());
    assert_eq!(report.models, 11);
    assert_eq!(report.fields, 47);
    assert_eq!(report.selection_options, 7);
    assert_eq!(report.constraints, 2);
    assert_eq!(report.relations, 1);
    assert_eq!(report.dropped_count(CatalogItemKind::Field), 1);
    assert_eq!(report.dropped_count(CatalogItemKind::Selection), 1);
    assert_eq!(report.dropped_count(CatalogItemKind::Constraint), 1);
    assert_eq!(report.dropped.len(), 3);
    assert_eq!(kb.model_count(), 11);
    assert!(kb.field_by_name("sale.order", "partner_id").is_some());
}

#[test]
fn duplicate_rows_keep_the_first() {
    let mut catalog = sample_catalog();
    let mut duplicate = catalog.fields[1].clone();
    duplicate.label = "Second Email".to_string();
    catalog.fields.push(duplicate);
    let mut model = catalog.models[0].clone();
    model.description = "Another Contact".to_string();
    catalog.models.push(model);

    let (kb, report) = KnowledgeBase::load(&catalog);
    let email = kb.field(&FieldKey::new("res.partner", "email")).expect("email field");
    assert_eq!(email.label, "Email");
    assert_eq!(report.dropped_count(CatalogItemKind::Field), 2);
    assert_eq!(report.dropped_count(CatalogItemKind::Model), 1);
}

#[test]
fn selection_options_attach_in_sequence_order() {
    let kb = sample_kb();
    let address_type = kb.field_by_name("res.partner", "type").expect("type field");
    let values: Vec<&str> = address_type
        .selection_options
        .iter()
        .map(|option| option.value.as_str())
        .collect();
    assert_eq!(values, vec!["contact", "invoice", "delivery"]);
    assert!(address_type.has_option("Invoice Address"));
}

#[test]
fn index_round_trip() {
    let kb = sample_kb();
    let zip = FieldKey::new("res.partner", "zip");
    assert!(kb.by_field_name("zip").contains(&zip));
    assert!(kb.by_label("zip").contains(&zip));
    assert!(kb.by_label("ZIP").contains(&zip));
    assert_eq!(kb.by_field_name("email").len(), 3);
    assert!(kb.by_selection_value("Quotation Sent").contains(&FieldKey::new("sale.order", "state")));
    assert_eq!(kb.by_type(FieldType::Monetary).len(), 1);
    assert_eq!(kb.by_related_model("res.partner").len(), 4);
}

#[test]
fn prefix_queries() {
    let kb = sample_kb();
    let hits = kb.prefix_match_label("order", 10);
    assert!(hits.contains(&FieldKey::new("sale.order", "name")));
    assert!(hits.contains(&FieldKey::new("sale.order", "date_order")));
    assert!(hits.contains(&FieldKey::new("sale.order.line", "order_id")));
    assert_eq!(kb.prefix_match_name("product_", 10).len(), 2);
    assert_eq!(kb.prefix_match_name("p", 3).len(), 3);
}

#[test]
fn required_fields_use_only_the_field_flag() {
    let kb = sample_kb();
    let names: Vec<&str> = kb
        .required_fields("sale.order")
        .into_iter()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(names, vec!["date_order", "name", "partner_id"]);
    // A unique constraint does not make `ref` required.
    assert!(kb.required_fields("res.partner").iter().all(|field| field.name != "ref"));
}

#[test]
fn relationship_queries() {
    let kb = sample_kb();
    let related = kb.related_models("sale.order", 1);
    assert!(related.contains("res.partner"));
    assert!(related.contains("res.users"));
    assert!(related.contains("sale.order.line"));
    assert!(!related.contains("res.country"));
    assert!(kb.related_models("sale.order", 2).contains("res.country"));

    let path = kb
        .path_between("sale.order.line", "res.country")
        .expect("connected models");
    assert_eq!(path, vec!["sale.order.line", "sale.order", "res.partner", "res.country"]);
    assert_eq!(kb.path_between("hr.employee", "res.partner"), None);
}

#[test]
fn auxiliary_tables_and_lookups() {
    let kb = sample_kb();
    let constraints = kb.constraints_of("res.partner");
    assert_eq!(constraints.len(), 1);
    assert_eq!(constraints[0].kind, ConstraintKind::Unique);
    assert_eq!(kb.relation_tables_of("res.partner").len(), 1);
    assert!(kb.constraints_of("hr.employee").is_empty());
    assert_eq!(
        kb.model_by_description("sales order").map(|model| model.name.as_str()),
        Some("sale.order")
    );
    assert_eq!(kb.fields_of_model("res.country").count(), 2);
}

#[test]
fn stats_count_field_kinds() {
    let stats = sample_kb().stats();
    assert_eq!(stats.models, 11);
    assert_eq!(stats.fields, 47);
    assert_eq!(stats.selection_fields, 3);
    assert_eq!(stats.relational_fields, 10);
    assert_eq!(stats.constraints, 2);
}

#[test]
fn validate_reports_without_failing() {
    let report = sample_kb().validate();
    assert!(!report.has_errors());
    let warnings: Vec<(&str, Option<&str>)> = report
        .issues
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Warning)
        .map(|issue| (issue.model.as_str(), issue.field.as_deref()))
        .collect();
    assert_eq!(
        warnings,
        vec![("project.task", Some("priority")), ("res.partner", Some("category_id"))]
    );
}

#[test]
fn empty_catalog_loads_to_empty_base() {
    let (kb, report) = KnowledgeBase::load(&Catalog::default());
    assert!(kb.is_empty());
    assert_eq!(report.models, 0);
    assert!(kb.by_field_name("name").is_empty());
}
