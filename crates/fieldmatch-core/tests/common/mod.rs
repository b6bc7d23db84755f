//! Shared fixtures for fieldmatch-core integration tests.

#![allow(dead_code)]

use fieldmatch_core::{KnowledgeBase, MatcherConfig, MatchingPipeline};
use fieldmatch_model::{
    Catalog, CatalogConstraint, CatalogField, CatalogModel, CatalogRelation, CatalogSelection,
    ColumnProfile, FieldType, ValuePattern,
};

fn model(id: &str, description: &str) -> CatalogModel {
    CatalogModel {
        id: id.to_string(),
        description: description.to_string(),
        kind: Some("Base Object".to_string()),
        transient: false,
    }
}

fn field(
    description: &str,
    name: &str,
    label: &str,
    field_type: FieldType,
    required: bool,
    related: Option<&str>,
) -> CatalogField {
    CatalogField {
        name: name.to_string(),
        label: label.to_string(),
        model_description: description.to_string(),
        field_type,
        base_type: None,
        indexed: false,
        stored: true,
        readonly: false,
        required,
        related_model: related.map(str::to_string),
    }
}

fn char_field(description: &str, name: &str, label: &str) -> CatalogField {
    field(description, name, label, FieldType::Char, false, None)
}

fn selection(key: &str, value: &str, display: &str, sequence: i32) -> CatalogSelection {
    CatalogSelection {
        field_key: key.to_string(),
        value: value.to_string(),
        display_name: display.to_string(),
        sequence,
    }
}

/// A small ERP-like catalog with a few deliberately unresolvable rows.
pub fn sample_catalog() -> Catalog {
    use FieldType::{Boolean, Char, Date, Datetime, Float, Many2many, Many2one, Monetary, Selection};

    let models = vec![
        model("res.partner", "Contact"),
        model("res.company", "Companies"),
        model("res.country", "Country"),
        model("res.users", "Users"),
        model("sale.order", "Sales Order"),
        model("sale.order.line", "Sales Order Line"),
        model("product.product", "Product"),
        model("hr.employee", "Employee"),
        model("mailing.contact", "Mailing Contact"),
        model("stock.warehouse", "Warehouse"),
        model("project.task", "Task"),
    ];

    let fields = vec![
        field("Contact", "name", "Name", Char, true, None),
        char_field("Contact", "email", "Email"),
        char_field("Contact", "phone", "Phone"),
        char_field("Contact", "mobile", "Mobile"),
        char_field("Contact", "street", "Street"),
        char_field("Contact", "city", "City"),
        char_field("Contact", "zip", "Zip"),
        field("Contact", "country_id", "Country", Many2one, false, Some("res.country")),
        field("Contact", "company_id", "Company", Many2one, false, Some("res.company")),
        field("Contact", "parent_id", "Related Company", Many2one, false, Some("res.partner")),
        field("Contact", "category_id", "Tags", Many2many, false, Some("res.partner.category")),
        char_field("Contact", "ref", "Reference"),
        field("Contact", "type", "Address Type", Selection, false, None),
        field("Contact", "is_company", "Is a Company", Boolean, false, None),
        char_field("Contact", "website", "Website Link"),
        char_field("Contact", "vat", "Tax ID"),
        field("Companies", "name", "Company Name", Char, true, None),
        char_field("Companies", "email", "Email"),
        field("Companies", "partner_id", "Partner", Many2one, true, Some("res.partner")),
        field("Country", "name", "Country Name", Char, true, None),
        char_field("Country", "code", "Country Code"),
        field("Users", "login", "Login", Char, true, None),
        field("Users", "partner_id", "Related Partner", Many2one, true, Some("res.partner")),
        field("Sales Order", "name", "Order Reference", Char, true, None),
        field("Sales Order", "partner_id", "Customer", Many2one, true, Some("res.partner")),
        field("Sales Order", "date_order", "Order Date", Datetime, true, None),
        field("Sales Order", "state", "Status", Selection, false, None),
        field("Sales Order", "amount_total", "Total", Monetary, false, None),
        field("Sales Order", "user_id", "Salesperson", Many2one, false, Some("res.users")),
        field("Sales Order Line", "order_id", "Order Reference", Many2one, true, Some("sale.order")),
        field("Sales Order Line", "product_id", "Product", Many2one, false, Some("product.product")),
        field("Sales Order Line", "product_uom_qty", "Quantity", Float, false, None),
        field("Sales Order Line", "price_unit", "Unit Price", Float, false, None),
        field("Sales Order Line", "discount", "Discount (%)", Float, false, None),
        field("Product", "name", "Name", Char, true, None),
        char_field("Product", "default_code", "Internal Reference"),
        char_field("Product", "barcode", "Barcode"),
        field("Product", "list_price", "Sales Price", Float, false, None),
        field("Employee", "name", "Employee Name", Char, true, None),
        char_field("Employee", "work_email", "Work Email"),
        char_field("Mailing Contact", "name", "Name"),
        char_field("Mailing Contact", "email", "Email"),
        field("Warehouse", "name", "Warehouse", Char, true, None),
        char_field("Warehouse", "code", "Short Name"),
        field("Task", "name", "Title", Char, true, None),
        field("Task", "date_deadline", "Deadline", Date, false, None),
        field("Task", "priority", "Priority", Selection, false, None),
        char_field("Helpdesk Ticket", "name", "Subject"),
    ];

    let selections = vec![
        selection("Address Type (Contact)", "delivery", "Delivery Address", 3),
        selection("Address Type (Contact)", "contact", "Contact", 1),
        selection("Address Type (Contact)", "invoice", "Invoice Address", 2),
        selection("Status (Sales Order)", "draft", "Quotation", 0),
        selection("Status (Sales Order)", "sent", "Quotation Sent", 1),
        selection("Status (Sales Order)", "sale", "Sales Order", 2),
        selection("Status (Sales Order)", "cancel", "Cancelled", 3),
        selection("Stage (Helpdesk Ticket)", "new", "New", 0),
    ];

    let constraints = vec![
        CatalogConstraint {
            kind: "u".to_string(),
            name: "res_partner_ref_uniq".to_string(),
            module: Some("base".to_string()),
            model_description: "Contact".to_string(),
        },
        CatalogConstraint {
            kind: "c".to_string(),
            name: "sale_order_date_check".to_string(),
            module: Some("sale".to_string()),
            model_description: "Sales Order".to_string(),
        },
        CatalogConstraint {
            kind: "u".to_string(),
            name: "helpdesk_ticket_uniq".to_string(),
            module: Some("helpdesk".to_string()),
            model_description: "Helpdesk Ticket".to_string(),
        },
    ];

    let relations = vec![CatalogRelation {
        name: "res_partner_res_partner_category_rel".to_string(),
        module: Some("base".to_string()),
        model_description: "Contact".to_string(),
    }];

    Catalog {
        models,
        fields,
        selections,
        constraints,
        relations,
    }
}

pub fn sample_kb() -> KnowledgeBase {
    KnowledgeBase::load(&sample_catalog()).0
}

pub fn pipeline() -> MatchingPipeline {
    pipeline_with(MatcherConfig::default())
}

pub fn pipeline_with(config: MatcherConfig) -> MatchingPipeline {
    MatchingPipeline::with_knowledge_base(config, sample_kb()).expect("sample pipeline")
}

/// A column of RFC-shaped addresses with a detected email ratio.
pub fn email_column(name: &str) -> ColumnProfile {
    let values = [
        "ana@example.com",
        "bo@example.org",
        "cy@example.net",
        "di@example.com",
        "ed@example.com",
        "fay@example.org",
        "gus@example.com",
        "hal@example.net",
        "ivy@example.com",
        "jo@example.com",
    ];
    ColumnProfile::from_values(name, "Contacts", &values).with_pattern(ValuePattern::Email, 0.95)
}

pub fn text_column(name: &str, values: &[&str]) -> ColumnProfile {
    ColumnProfile::from_values(name, "Sheet1", values)
}

pub fn find<'a>(
    mappings: &'a [fieldmatch_model::FieldMapping],
    model: &str,
    field: &str,
) -> Option<&'a fieldmatch_model::FieldMapping> {
    mappings
        .iter()
        .find(|mapping| mapping.target_model == model && mapping.target_field == field)
}
