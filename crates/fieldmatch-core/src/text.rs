//! Name normalization and string similarity helpers.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Split a raw name into lowercase words.
///
/// Breaks on any non-alphanumeric character and on lower-to-upper camelCase
/// boundaries, so `customerEmail`, `customer_email` and `Customer Email`
/// all yield `["customer", "email"]`.
pub fn split_words(raw: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Technical form of a name: lowercase words joined by `_`.
pub fn normalize_name(raw: &str) -> String {
    split_words(raw).join("_")
}

/// Label form of a name: lowercase words joined by a single space.
pub fn normalize_label(raw: &str) -> String {
    split_words(raw).join(" ")
}

/// Content tokens of a name: words minus digits-only words, single letters and stopwords.
pub fn name_tokens(raw: &str) -> BTreeSet<String> {
    split_words(raw)
        .into_iter()
        .filter(|word| word.chars().count() > 1)
        .filter(|word| !word.chars().all(|ch| ch.is_ascii_digit()))
        .filter(|word| !is_stopword(word))
        .collect()
}

/// Returns true if any token equals a keyword, or starts with one of four or more letters.
pub fn tokens_mention(tokens: &BTreeSet<String>, keywords: &[&str]) -> bool {
    tokens.iter().any(|token| {
        keywords.iter().any(|keyword| {
            token == keyword || (keyword.len() >= 4 && token.starts_with(keyword))
        })
    })
}

/// Returns true if the label form of `name` contains any of the fragments.
pub fn mentions_any(name: &str, fragments: &[&str]) -> bool {
    let label = normalize_label(name);
    let compact = label.replace(' ', "");
    fragments
        .iter()
        .any(|fragment| label.contains(fragment) || compact.contains(fragment))
}

/// Normalized Indel similarity (`2 * LCS / (|a| + |b|)`), 0.0 when either side is empty.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

pub fn token_jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Longest common substring length relative to the longer string.
pub fn substring_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longer = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut best = 0usize;
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb { previous[j] + 1 } else { 0 };
            best = best.max(current[j + 1]);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    best as f64 / longer as f64
}

fn is_stopword(token: &str) -> bool {
    matches!(
        token,
        "of" | "and"
            | "the"
            | "to"
            | "for"
            | "in"
            | "on"
            | "at"
            | "with"
            | "by"
            | "from"
            | "or"
            | "an"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_separators_and_camel_case() {
        assert_eq!(split_words("customer_email"), vec!["customer", "email"]);
        assert_eq!(split_words("customerEmail"), vec!["customer", "email"]);
        assert_eq!(split_words("  Customer - Email "), vec!["customer", "email"]);
        assert_eq!(split_words("VAT"), vec!["vat"]);
        assert_eq!(split_words("TaxID"), vec!["tax", "id"]);
    }

    #[test]
    fn normal_forms() {
        assert_eq!(normalize_name("First Name"), "first_name");
        assert_eq!(normalize_label("first_name"), "first name");
        assert_eq!(normalize_name("XYZ_UNKNOWN_9912"), "xyz_unknown_9912");
    }

    #[test]
    fn tokens_drop_digits_and_stopwords() {
        let tokens = name_tokens("Date of Birth 2024");
        assert!(tokens.contains("date"));
        assert!(tokens.contains("birth"));
        assert!(!tokens.contains("of"));
        assert!(!tokens.contains("2024"));
    }

    #[test]
    fn keyword_mention_uses_prefix_for_long_keywords() {
        let tokens = name_tokens("email_normalized");
        assert!(tokens_mention(&tokens, &["email"]));
        let tokens = name_tokens("island");
        assert!(!tokens_mention(&tokens, &["is"]));
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(sequence_ratio("email", "email"), 1.0);
        assert_eq!(sequence_ratio("", "email"), 0.0);
        assert!(sequence_ratio("email", "e_mail") > 0.8);
        assert_eq!(substring_ratio("email", "work_email"), 0.5);
        assert_eq!(substring_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn jaccard_of_token_sets() {
        let a = name_tokens("customer email");
        let b = name_tokens("email");
        assert_eq!(token_jaccard(&a, &b), 0.5);
    }
}
