#![deny(unsafe_code)]

use std::path::Path;

use fieldmatch_model::{CatalogField, FieldType};
use tracing::debug;

use super::{CsvTable, get_bool, get_string};
use crate::error::CatalogError;

pub fn parse_fields_csv(path: &Path) -> Result<Vec<CatalogField>, CatalogError> {
    let table = CsvTable::read(path)?;
    let idx_name = table.required_column(&["Field Name", "Name"])?;
    let idx_model = table.required_column(&["Model", "Model Description"])?;
    let idx_type = table.required_column(&["Field Type", "Type"])?;
    let idx_label = table.column(&["Field Label", "Label", "Description"]);
    let idx_base_type = table.column(&["Base Type"]);
    let idx_indexed = table.column(&["Indexed"]);
    let idx_stored = table.column(&["Stored"]);
    let idx_readonly = table.column(&["Readonly", "Read Only"]);
    let idx_required = table.column(&["Required"]);
    let idx_relation = table.column(&["Related Model", "Object Relation", "Relation"]);

    let mut fields = Vec::new();
    for row in table.records() {
        let (Some(name), Some(model_description)) = (
            get_string(row, Some(idx_name)),
            get_string(row, Some(idx_model)),
        ) else {
            debug!(path = %table.path().display(), "skipping field row without name or model");
            continue;
        };
        let base_type = get_string(row, idx_base_type);
        let mut field_type = get_string(row, Some(idx_type))
            .map(|raw| FieldType::parse(&raw))
            .unwrap_or(FieldType::Unknown);
        if field_type == FieldType::Unknown
            && let Some(base) = base_type.as_deref()
        {
            field_type = FieldType::parse(base);
        }
        fields.push(CatalogField {
            label: get_string(row, idx_label).unwrap_or_else(|| name.clone()),
            name,
            model_description,
            field_type,
            base_type,
            indexed: get_bool(row, idx_indexed),
            stored: get_bool(row, idx_stored),
            readonly: get_bool(row, idx_readonly),
            required: get_bool(row, idx_required),
            related_model: get_string(row, idx_relation),
        });
    }
    Ok(fields)
}
