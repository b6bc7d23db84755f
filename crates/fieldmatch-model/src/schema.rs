use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage type of a target field as declared by the schema catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Char,
    Text,
    Html,
    Selection,
    Integer,
    Float,
    Monetary,
    Date,
    Datetime,
    Boolean,
    Binary,
    Many2one,
    One2many,
    Many2many,
    /// Anything the catalog declares that the engine has no rule for.
    Unknown,
}

impl FieldType {
    /// Parse a catalog type token, falling back to [`FieldType::Unknown`].
    ///
    /// Accepts both technical tokens (`many2one`) and display forms
    /// (`Many2One`, `many-to-one`, `Char (char)`).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        // Display forms like "Many2One (many2one)" carry the token in parentheses.
        let token = match (trimmed.rfind('('), trimmed.strip_suffix(')')) {
            (Some(open), Some(inner)) => &inner[open + 1..],
            _ => trimmed,
        };
        let compact: String = token
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "char" | "string" | "varchar" => FieldType::Char,
            "text" => FieldType::Text,
            "html" => FieldType::Html,
            "selection" => FieldType::Selection,
            "integer" | "int" => FieldType::Integer,
            "float" | "decimal" => FieldType::Float,
            "monetary" => FieldType::Monetary,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            "boolean" | "bool" => FieldType::Boolean,
            "binary" | "image" => FieldType::Binary,
            "many2one" | "manytoone" => FieldType::Many2one,
            "one2many" | "onetomany" => FieldType::One2many,
            "many2many" | "manytomany" => FieldType::Many2many,
            _ => FieldType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Char => "char",
            FieldType::Text => "text",
            FieldType::Html => "html",
            FieldType::Selection => "selection",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Monetary => "monetary",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Binary => "binary",
            FieldType::Many2one => "many2one",
            FieldType::One2many => "one2many",
            FieldType::Many2many => "many2many",
            FieldType::Unknown => "unknown",
        }
    }

    /// Returns true for relational types that point at another model.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            FieldType::Many2one | FieldType::One2many | FieldType::Many2many
        )
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Char | FieldType::Text | FieldType::Html)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Float | FieldType::Monetary
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Unique address of a field across the whole schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey {
    pub model: String,
    pub field: String,
}

impl FieldKey {
    pub fn new(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.model, self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Canonical technical identifier, e.g. `res.partner`.
    pub name: String,
    pub description: String,
    pub kind: Option<String>,
    #[serde(default)]
    pub transient: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub value: String,
    pub display_name: String,
    pub sequence: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub model: String,
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    /// Raw base type as reported by the catalog, kept for display.
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
    /// Options for selection fields, ordered by sequence once loaded.
    #[serde(default)]
    pub selection_options: Vec<SelectionOption>,
}

impl FieldDefinition {
    pub fn key(&self) -> FieldKey {
        FieldKey::new(self.model.clone(), self.name.clone())
    }

    /// Returns true if `value` equals one of the option values or display names.
    pub fn has_option(&self, value: &str) -> bool {
        self.selection_options.iter().any(|option| {
            option.value.eq_ignore_ascii_case(value)
                || option.display_name.eq_ignore_ascii_case(value)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Unique,
    Check,
    Foreign,
    Other,
}

impl ConstraintKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "u" | "unique" => ConstraintKind::Unique,
            "c" | "check" => ConstraintKind::Check,
            "f" | "foreign" | "foreign key" => ConstraintKind::Foreign,
            _ => ConstraintKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    pub model: String,
    pub kind: ConstraintKind,
    pub name: String,
    pub module: Option<String>,
}

/// A many-to-many relation table owned by a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDefinition {
    pub model: String,
    pub name: String,
    pub module: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_and_technical_forms() {
        assert_eq!(FieldType::parse("many2one"), FieldType::Many2one);
        assert_eq!(FieldType::parse("Many2One"), FieldType::Many2one);
        assert_eq!(FieldType::parse("many-to-many"), FieldType::Many2many);
        assert_eq!(FieldType::parse("Char (char)"), FieldType::Char);
        assert_eq!(FieldType::parse("properties"), FieldType::Unknown);
    }

    #[test]
    fn field_key_displays_dotted() {
        assert_eq!(FieldKey::new("res.partner", "email").to_string(), "res.partner.email");
    }
}
