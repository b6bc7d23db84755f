//! Entity-prefixed column names such as `customer_email` or `Product Name`.

use serde::Serialize;

use crate::text::split_words;

/// Entity words that name a model when they lead or trail a column name.
pub const ENTITY_PREFIXES: &[(&str, &str)] = &[
    ("customer", "res.partner"),
    ("client", "res.partner"),
    ("partner", "res.partner"),
    ("contact", "res.partner"),
    ("vendor", "res.partner"),
    ("supplier", "res.partner"),
    ("company", "res.company"),
    ("product", "product.product"),
    ("employee", "hr.employee"),
    ("user", "res.users"),
    ("salesperson", "res.users"),
    ("order", "sale.order"),
    ("sale", "sale.order"),
    ("purchase", "purchase.order"),
    ("invoice", "account.move"),
    ("bill", "account.move"),
    ("payment", "account.payment"),
    ("project", "project.project"),
    ("task", "project.task"),
    ("lead", "crm.lead"),
    ("opportunity", "crm.lead"),
    ("warehouse", "stock.warehouse"),
    ("location", "stock.location"),
    ("country", "res.country"),
    ("currency", "res.currency"),
];

/// A column name split into an entity prefix and the remaining field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundName {
    pub prefix: Option<String>,
    /// Field part in technical form.
    pub field: String,
    pub suggested_model: Option<String>,
}

impl CompoundName {
    fn plain(field: String) -> Self {
        Self {
            prefix: None,
            field,
            suggested_model: None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.prefix.is_some()
    }
}

pub fn entity_model(word: &str) -> Option<&'static str> {
    ENTITY_PREFIXES
        .iter()
        .find(|(prefix, _)| *prefix == word)
        .map(|(_, model)| *model)
}

/// Split `column` into an entity prefix and field name.
///
/// The first word is tried as the prefix, then the last. A remainder of
/// `id` or `ids` is a foreign-key column, not a compound name, so
/// `partner_id` parses as the plain name `partner_id`.
pub fn parse_compound_name(column: &str) -> CompoundName {
    let words = split_words(column);
    let whole = words.join("_");
    if words.len() < 2 {
        return CompoundName::plain(whole);
    }
    let leading = (&words[0], &words[1..]);
    let trailing = (&words[words.len() - 1], &words[..words.len() - 1]);
    for (prefix, rest) in [leading, trailing] {
        let Some(model) = entity_model(prefix) else {
            continue;
        };
        let field = rest.join("_");
        if matches!(field.as_str(), "id" | "ids") {
            return CompoundName::plain(whole);
        }
        return CompoundName {
            prefix: Some(prefix.clone()),
            field,
            suggested_model: Some(model.to_string()),
        };
    }
    CompoundName::plain(whole)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_prefix() {
        let parsed = parse_compound_name("customer_email");
        assert_eq!(parsed.prefix.as_deref(), Some("customer"));
        assert_eq!(parsed.field, "email");
        assert_eq!(parsed.suggested_model.as_deref(), Some("res.partner"));
    }

    #[test]
    fn trailing_prefix_and_label_form() {
        let parsed = parse_compound_name("Email Customer");
        assert_eq!(parsed.field, "email");
        assert_eq!(parsed.suggested_model.as_deref(), Some("res.partner"));

        let parsed = parse_compound_name("Product Name");
        assert_eq!(parsed.field, "name");
        assert_eq!(parsed.suggested_model.as_deref(), Some("product.product"));
    }

    #[test]
    fn foreign_key_columns_are_not_compound() {
        let parsed = parse_compound_name("partner_id");
        assert!(!parsed.is_compound());
        assert_eq!(parsed.field, "partner_id");
    }

    #[test]
    fn plain_names() {
        assert!(!parse_compound_name("email").is_compound());
        assert!(!parse_compound_name("First Name").is_compound());
        assert_eq!(parse_compound_name("XYZ_UNKNOWN_9912").field, "xyz_unknown_9912");
    }
}
