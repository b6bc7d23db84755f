#![deny(unsafe_code)]

use std::path::Path;

use fieldmatch_model::CatalogSelection;

use super::{CsvTable, get_string};
use crate::error::CatalogError;

pub fn parse_selections_csv(path: &Path) -> Result<Vec<CatalogSelection>, CatalogError> {
    let table = CsvTable::read(path)?;
    let idx_field = table.required_column(&["Field"])?;
    let idx_value = table.required_column(&["Value"])?;
    let idx_name = table.column(&["Name", "Display Name"]);
    let idx_sequence = table.column(&["Sequence"]);

    let mut selections = Vec::new();
    for row in table.records() {
        let (Some(field_key), Some(value)) = (
            get_string(row, Some(idx_field)),
            get_string(row, Some(idx_value)),
        ) else {
            continue;
        };
        selections.push(CatalogSelection {
            display_name: get_string(row, idx_name).unwrap_or_else(|| value.clone()),
            field_key,
            value,
            sequence: get_string(row, idx_sequence)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0),
        });
    }
    Ok(selections)
}
