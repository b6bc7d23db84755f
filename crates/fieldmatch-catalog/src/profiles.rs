#![deny(unsafe_code)]

//! Column profiles handed over by an external profiler as JSON.

use std::path::Path;

use fieldmatch_model::ColumnProfile;
use serde::Deserialize;

use crate::error::CatalogError;

/// A sheet wrapper around profiles; the bare-array form is accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSheet {
    #[serde(default)]
    pub sheet_name: Option<String>,
    pub columns: Vec<ColumnProfile>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileDocument {
    Sheet(ProfileSheet),
    Columns(Vec<ColumnProfile>),
}

pub fn load_profiles(path: &Path) -> Result<Vec<ColumnProfile>, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    parse_profiles(&contents).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse profiles, filling a missing per-column sheet name from the wrapper.
pub fn parse_profiles(contents: &str) -> Result<Vec<ColumnProfile>, serde_json::Error> {
    let document: ProfileDocument = serde_json::from_str(contents)?;
    Ok(match document {
        ProfileDocument::Columns(columns) => columns,
        ProfileDocument::Sheet(sheet) => {
            let sheet_name = sheet.sheet_name.unwrap_or_default();
            sheet
                .columns
                .into_iter()
                .map(|mut column| {
                    if column.sheet_name.is_empty() {
                        column.sheet_name = sheet_name.clone();
                    }
                    column
                })
                .collect()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_array() {
        let profiles = parse_profiles(r#"[{"name": "Email"}, {"name": "Phone"}]"#).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].name, "Phone");
    }

    #[test]
    fn sheet_wrapper_fills_sheet_name() {
        let profiles = parse_profiles(
            r#"{"sheet_name": "Customers", "columns": [{"name": "Email"}, {"name": "City", "sheet_name": "Other"}]}"#,
        )
        .unwrap();
        assert_eq!(profiles[0].sheet_name, "Customers");
        assert_eq!(profiles[1].sheet_name, "Other");
    }
}
