//! Derived full-name mapping for sheets that split first and last names.

use fieldmatch_model::{ColumnProfile, FieldKey, FieldMapping};

use super::report::ColumnMatch;
use super::stages::ConfidenceThresholds;
use crate::knowledge_base::KnowledgeBase;
use crate::text::normalize_label;

const FIRST_NAME_FORMS: &[&str] = &["first name", "firstname", "first", "given name", "fname", "forename"];
const LAST_NAME_FORMS: &[&str] = &["last name", "lastname", "surname", "family name", "lname"];

pub(crate) const FULL_NAME_PROVENANCE: &str = "Derived[FullName]";
const FULL_NAME_CONFIDENCE: f64 = 0.85;
const PARTNER_MODEL: &str = "res.partner";
const NAME_FIELD: &str = "name";

fn find_column<'a>(profiles: &'a [ColumnProfile], forms: &[&str]) -> Option<&'a str> {
    profiles
        .iter()
        .map(|profile| profile.name.as_str())
        .find(|name| forms.contains(&normalize_label(name).as_str()))
}

/// A synthetic `"<first> + <last>"` column mapped to the partner name.
///
/// Returns `None` unless both name parts are present, the partner name field
/// is loaded, and the derived confidence clears the medium threshold.
pub(crate) fn derive_full_name(
    kb: &KnowledgeBase,
    profiles: &[ColumnProfile],
    thresholds: &ConfidenceThresholds,
) -> Option<ColumnMatch> {
    let first = find_column(profiles, FIRST_NAME_FORMS)?;
    let last = find_column(profiles, LAST_NAME_FORMS)?;
    let key = FieldKey::new(PARTNER_MODEL, NAME_FIELD);
    kb.field(&key)?;
    let tier = thresholds.categorize(FULL_NAME_CONFIDENCE)?;

    let column = format!("{first} + {last}");
    let mut mapping = FieldMapping::new(
        column.clone(),
        &key,
        FULL_NAME_CONFIDENCE,
        FULL_NAME_PROVENANCE,
        format!("'{first}' and '{last}' together form the contact name"),
    );
    mapping.tier = Some(tier);
    mapping.transformation = Some(format!("concat({first}, ' ', {last})"));
    Some(ColumnMatch {
        column,
        mappings: vec![mapping],
        runs: Vec::new(),
    })
}
