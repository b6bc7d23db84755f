#![deny(unsafe_code)]

use std::path::Path;

use fieldmatch_model::CatalogModel;
use tracing::debug;

use super::{CsvTable, get_bool, get_string};
use crate::error::CatalogError;

pub fn parse_models_csv(path: &Path) -> Result<Vec<CatalogModel>, CatalogError> {
    let table = CsvTable::read(path)?;
    let idx_id = table.required_column(&["Model", "Model Name", "id"])?;
    let idx_description = table.required_column(&["Model Description", "Description", "Name"])?;
    let idx_kind = table.column(&["Type", "Kind", "State"]);
    let idx_transient = table.column(&["Transient Model", "Transient"]);

    let mut models = Vec::new();
    for row in table.records() {
        let (Some(id), Some(description)) = (
            get_string(row, Some(idx_id)),
            get_string(row, Some(idx_description)),
        ) else {
            debug!(path = %table.path().display(), "skipping model row without id or description");
            continue;
        };
        models.push(CatalogModel {
            id,
            description,
            kind: get_string(row, idx_kind),
            transient: get_bool(row, idx_transient),
        });
    }
    Ok(models)
}
