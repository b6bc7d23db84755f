#![deny(unsafe_code)]

//! Constraint and many-to-many relation table listings.

use std::path::Path;

use fieldmatch_model::{CatalogConstraint, CatalogRelation};

use super::{CsvTable, get_string};
use crate::error::CatalogError;

pub fn parse_constraints_csv(path: &Path) -> Result<Vec<CatalogConstraint>, CatalogError> {
    let table = CsvTable::read(path)?;
    let idx_name = table.required_column(&["Constraint", "Name"])?;
    let idx_model = table.required_column(&["Model", "Model Description"])?;
    let idx_kind = table.column(&["Type", "Constraint Type"]);
    let idx_module = table.column(&["Module"]);

    let mut constraints = Vec::new();
    for row in table.records() {
        let (Some(name), Some(model_description)) = (
            get_string(row, Some(idx_name)),
            get_string(row, Some(idx_model)),
        ) else {
            continue;
        };
        constraints.push(CatalogConstraint {
            kind: get_string(row, idx_kind).unwrap_or_default(),
            name,
            module: get_string(row, idx_module),
            model_description,
        });
    }
    Ok(constraints)
}

pub fn parse_relations_csv(path: &Path) -> Result<Vec<CatalogRelation>, CatalogError> {
    let table = CsvTable::read(path)?;
    let idx_name = table.required_column(&["Relation Name", "Name"])?;
    let idx_model = table.required_column(&["Model", "Model Description"])?;
    let idx_module = table.column(&["Module"]);

    let mut relations = Vec::new();
    for row in table.records() {
        let (Some(name), Some(model_description)) = (
            get_string(row, Some(idx_name)),
            get_string(row, Some(idx_model)),
        ) else {
            continue;
        };
        relations.push(CatalogRelation {
            name,
            module: get_string(row, idx_module),
            model_description,
        });
    }
    Ok(relations)
}
