//! Sheet-level business domain detection.
//!
//! Each [`DomainSignature`] lists column-name fragments that a sheet from
//! that domain usually carries. Domains that score above their threshold
//! contribute their models, with earlier-listed models weighted higher.

use std::collections::BTreeMap;

use fieldmatch_model::{ColumnProfile, ValuePattern};
use serde::Serialize;
use tracing::debug;

use crate::text::normalize_label;

/// Required and optional column-name fragments of one business domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainSignature {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    /// Value patterns whose presence boosts the domain.
    pub patterns: &'static [ValuePattern],
    pub weight: f64,
    /// Minimum weighted score for the domain to qualify.
    pub threshold: f64,
    /// Models the domain implies, most important first.
    pub models: &'static [&'static str],
}

pub const DOMAIN_SIGNATURES: &[DomainSignature] = &[
    DomainSignature {
        name: "contacts",
        required: &["name"],
        optional: &[
            "email", "phone", "mobile", "street", "city", "zip", "country", "website", "vat",
            "address",
        ],
        patterns: &[ValuePattern::Email, ValuePattern::Phone, ValuePattern::Url],
        weight: 1.0,
        threshold: 0.65,
        models: &["res.partner", "res.country", "res.country.state"],
    },
    DomainSignature {
        name: "sales",
        required: &["order", "customer"],
        optional: &["quantity", "qty", "price", "product", "amount", "total", "salesperson", "date"],
        patterns: &[ValuePattern::Currency],
        weight: 1.0,
        threshold: 0.6,
        models: &["sale.order", "sale.order.line", "res.partner", "product.product"],
    },
    DomainSignature {
        name: "purchasing",
        required: &["purchase", "vendor"],
        optional: &["quantity", "qty", "price", "product", "amount", "supplier", "date"],
        patterns: &[ValuePattern::Currency],
        weight: 1.0,
        threshold: 0.6,
        models: &["purchase.order", "purchase.order.line", "res.partner", "product.product"],
    },
    DomainSignature {
        name: "invoicing",
        required: &["invoice", "amount"],
        optional: &["due", "tax", "total", "payment", "journal", "account", "currency", "date"],
        patterns: &[ValuePattern::Currency, ValuePattern::Date],
        weight: 1.0,
        threshold: 0.6,
        models: &["account.move", "account.move.line", "account.payment", "account.journal"],
    },
    DomainSignature {
        name: "inventory",
        required: &["product", "quantity"],
        optional: &["warehouse", "location", "stock", "lot", "serial", "uom", "barcode"],
        patterns: &[],
        weight: 0.9,
        threshold: 0.6,
        models: &[
            "stock.quant",
            "stock.move",
            "stock.location",
            "stock.warehouse",
            "product.product",
        ],
    },
    DomainSignature {
        name: "products",
        required: &["product"],
        optional: &[
            "price", "cost", "barcode", "category", "sku", "code", "uom", "weight", "description",
        ],
        patterns: &[ValuePattern::Currency],
        weight: 0.9,
        threshold: 0.65,
        models: &["product.template", "product.product", "product.category"],
    },
    DomainSignature {
        name: "human_resources",
        required: &["employee"],
        optional: &["department", "job", "manager", "salary", "hire", "birthday", "badge"],
        patterns: &[ValuePattern::Date],
        weight: 1.0,
        threshold: 0.6,
        models: &["hr.employee", "hr.department", "hr.job"],
    },
    DomainSignature {
        name: "projects",
        required: &["project", "task"],
        optional: &["deadline", "assigned", "stage", "milestone", "hours", "priority"],
        patterns: &[ValuePattern::Date],
        weight: 1.0,
        threshold: 0.6,
        models: &["project.project", "project.task"],
    },
    DomainSignature {
        name: "crm",
        required: &["lead"],
        optional: &["opportunity", "stage", "probability", "revenue", "email", "phone", "salesperson"],
        patterns: &[ValuePattern::Email, ValuePattern::Phone],
        weight: 1.0,
        threshold: 0.6,
        models: &["crm.lead", "res.partner"],
    },
];

const REQUIRED_WEIGHT: f64 = 0.6;
const OPTIONAL_WEIGHT: f64 = 0.2;
const PATTERN_WEIGHT: f64 = 0.2;
const MODEL_DECAY: f64 = 0.85;

/// Score of one qualifying domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainMatch {
    pub domain: String,
    pub score: f64,
    pub required_ratio: f64,
    pub optional_ratio: f64,
    pub pattern_boost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecommendation {
    pub model: String,
    pub score: f64,
    /// Domains that contributed to the score.
    pub domains: Vec<String>,
}

/// Qualifying domains and the models they recommend, both best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessContext {
    pub domains: Vec<DomainMatch>,
    pub models: Vec<ModelRecommendation>,
}

impl BusinessContext {
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|rec| rec.model.as_str())
    }
}

/// Scores a sheet's column names against domain signatures.
#[derive(Debug, Clone)]
pub struct BusinessContextAnalyzer {
    signatures: Vec<DomainSignature>,
}

impl Default for BusinessContextAnalyzer {
    fn default() -> Self {
        Self {
            signatures: DOMAIN_SIGNATURES.to_vec(),
        }
    }
}

impl BusinessContextAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signatures(signatures: Vec<DomainSignature>) -> Self {
        Self { signatures }
    }

    pub fn signatures(&self) -> &[DomainSignature] {
        &self.signatures
    }

    pub fn analyze(&self, profiles: &[ColumnProfile]) -> BusinessContext {
        let names: Vec<String> = profiles
            .iter()
            .map(|profile| normalize_label(&profile.name))
            .collect();

        let mut domains = Vec::new();
        let mut totals: BTreeMap<&str, (f64, Vec<String>)> = BTreeMap::new();
        for signature in &self.signatures {
            let scored = score_signature(signature, &names, profiles);
            debug!(domain = signature.name, score = scored.score, "domain signature scored");
            if scored.score <= signature.threshold {
                continue;
            }
            let mut priority = scored.score;
            for model in signature.models {
                let entry = totals.entry(*model).or_insert_with(|| (0.0, Vec::new()));
                entry.0 += priority;
                entry.1.push(signature.name.to_string());
                priority *= MODEL_DECAY;
            }
            domains.push(scored);
        }

        domains.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.domain.cmp(&b.domain))
        });
        let mut models: Vec<ModelRecommendation> = totals
            .into_iter()
            .map(|(model, (score, domains))| ModelRecommendation {
                model: model.to_string(),
                score,
                domains,
            })
            .collect();
        models.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.model.cmp(&b.model))
        });
        BusinessContext { domains, models }
    }

    /// Ranked model list implied by the sheet's column names.
    pub fn recommend_models(&self, profiles: &[ColumnProfile]) -> Vec<ModelRecommendation> {
        self.analyze(profiles).models
    }
}

fn score_signature(
    signature: &DomainSignature,
    names: &[String],
    profiles: &[ColumnProfile],
) -> DomainMatch {
    let required_ratio = fragment_ratio(signature.required, names);
    let optional_ratio = fragment_ratio(signature.optional, names);
    let pattern_boost = signature
        .patterns
        .iter()
        .flat_map(|pattern| profiles.iter().map(move |profile| profile.pattern_ratio(*pattern)))
        .fold(0.0_f64, f64::max)
        .clamp(0.0, 1.0);
    let raw = REQUIRED_WEIGHT * required_ratio
        + OPTIONAL_WEIGHT * optional_ratio
        + PATTERN_WEIGHT * pattern_boost;
    DomainMatch {
        domain: signature.name.to_string(),
        score: raw * signature.weight,
        required_ratio,
        optional_ratio,
        pattern_boost,
    }
}

fn fragment_ratio(fragments: &[&str], names: &[String]) -> f64 {
    if fragments.is_empty() {
        return 0.0;
    }
    let hits = fragments
        .iter()
        .filter(|fragment| {
            names
                .iter()
                .any(|name| name.contains(**fragment) || name.replace(' ', "").contains(**fragment))
        })
        .count();
    hits as f64 / fragments.len() as f64
}
