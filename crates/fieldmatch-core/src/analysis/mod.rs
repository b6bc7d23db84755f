//! Column-name and sheet-level analysis that steers model priority.

mod business;
mod compound;

pub use business::{
    BusinessContext, BusinessContextAnalyzer, DOMAIN_SIGNATURES, DomainMatch, DomainSignature,
    ModelRecommendation,
};
pub use compound::{CompoundName, ENTITY_PREFIXES, entity_model, parse_compound_name};
