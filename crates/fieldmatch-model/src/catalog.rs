//! Raw catalog records as supplied by a catalog loader.
//!
//! Every collection except models references its owning model by
//! *description*, not by technical name. Resolution happens when the
//! knowledge base is loaded.

use serde::{Deserialize, Serialize};

use crate::schema::FieldType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id: String,
    pub description: String,
    pub kind: Option<String>,
    #[serde(default)]
    pub transient: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogField {
    pub name: String,
    pub label: String,
    pub model_description: String,
    pub field_type: FieldType,
    pub base_type: Option<String>,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub stored: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub required: bool,
    pub related_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSelection {
    /// Owning field formatted as `Label (Model Description)`.
    pub field_key: String,
    pub value: String,
    pub display_name: String,
    #[serde(default)]
    pub sequence: i32,
}

impl CatalogSelection {
    /// Candidate `(label, model description)` splits of the field key, rightmost first.
    ///
    /// Descriptions may themselves contain parentheses, so every ` (` position
    /// is offered and the caller keeps the first one that resolves.
    pub fn field_key_splits(&self) -> Vec<(&str, &str)> {
        let Some(inner) = self.field_key.trim().strip_suffix(')') else {
            return Vec::new();
        };
        let mut splits = Vec::new();
        let mut search_end = inner.len();
        while let Some(pos) = inner[..search_end].rfind(" (") {
            let label = inner[..pos].trim();
            let description = inner[pos + 2..].trim();
            if !label.is_empty() && !description.is_empty() {
                splits.push((label, description));
            }
            search_end = pos;
        }
        splits
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConstraint {
    pub kind: String,
    pub name: String,
    pub module: Option<String>,
    pub model_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRelation {
    pub name: String,
    pub module: Option<String>,
    pub model_description: String,
}

/// The five collections a catalog loader hands to the knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub models: Vec<CatalogModel>,
    pub fields: Vec<CatalogField>,
    #[serde(default)]
    pub selections: Vec<CatalogSelection>,
    #[serde(default)]
    pub constraints: Vec<CatalogConstraint>,
    #[serde(default)]
    pub relations: Vec<CatalogRelation>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.fields.is_empty()
    }
}
