#![deny(unsafe_code)]

use std::path::Path;

use fieldmatch_model::Catalog;
use tracing::{debug, info};

use crate::csv::fields::parse_fields_csv;
use crate::csv::models::parse_models_csv;
use crate::csv::selections::parse_selections_csv;
use crate::csv::tables::{parse_constraints_csv, parse_relations_csv};
use crate::error::CatalogError;

/// File names read from a catalog directory, in load order.
pub const CATALOG_FILES: [&str; 5] = [
    "models.csv",
    "fields.csv",
    "selections.csv",
    "constraints.csv",
    "relations.csv",
];

/// Read a catalog directory.
///
/// `models.csv` and `fields.csv` are required; the other three files are
/// optional and read as empty when absent.
pub fn load_catalog_dir(dir: &Path) -> Result<Catalog, CatalogError> {
    let models = parse_models_csv(&require(dir, "models.csv")?)?;
    let fields = parse_fields_csv(&require(dir, "fields.csv")?)?;
    let selections = optional(dir, "selections.csv", parse_selections_csv)?;
    let constraints = optional(dir, "constraints.csv", parse_constraints_csv)?;
    let relations = optional(dir, "relations.csv", parse_relations_csv)?;

    info!(
        dir = %dir.display(),
        models = models.len(),
        fields = fields.len(),
        selections = selections.len(),
        constraints = constraints.len(),
        relations = relations.len(),
        "read catalog"
    );
    Ok(Catalog {
        models,
        fields,
        selections,
        constraints,
        relations,
    })
}

fn require(dir: &Path, name: &str) -> Result<std::path::PathBuf, CatalogError> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(CatalogError::MissingFile { path })
    }
}

fn optional<T>(
    dir: &Path,
    name: &str,
    parse: fn(&Path) -> Result<Vec<T>, CatalogError>,
) -> Result<Vec<T>, CatalogError> {
    let path = dir.join(name);
    if !path.is_file() {
        debug!(path = %path.display(), "optional catalog file not present");
        return Ok(Vec::new());
    }
    parse(&path)
}
