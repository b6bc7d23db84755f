#![deny(unsafe_code)]

//! Schema matching engine.
//!
//! Matches spreadsheet columns, described by a [`ColumnProfile`], against the
//! fields of a large target schema held in a [`KnowledgeBase`]. Eight
//! independent strategies each score one signal class; the
//! [`MatchingPipeline`] merges their votes, adjusts for model priority,
//! ranks, and keeps what clears the configured confidence tiers.
//!
//! # Example
//!
//! ```ignore
//! use fieldmatch_core::{MatcherConfig, MatchingPipeline};
//!
//! let pipeline = MatchingPipeline::new(MatcherConfig::default())?;
//! pipeline.load_catalog(&catalog)?;
//! let sheet = pipeline.match_sheet(&profiles, None)?;
//! for column in &sheet.columns {
//!     if let Some(best) = column.best() {
//!         println!("{} -> {}.{}", column.column, best.target_model, best.target_field);
//!     }
//! }
//! ```
//!
//! [`ColumnProfile`]: fieldmatch_model::ColumnProfile

pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod knowledge_base;
pub mod pipeline;
pub mod store;
pub mod strategies;
pub mod text;

pub use analysis::{
    BusinessContext, BusinessContextAnalyzer, CompoundName, DomainMatch, DomainSignature,
    ModelRecommendation, parse_compound_name,
};
pub use config::MatcherConfig;
pub use context::MatchingContext;
pub use error::{ConfigError, KnowledgeBaseError, MatchError, Result, StrategyError};
pub use knowledge_base::{
    CatalogItemKind, DroppedItem, KnowledgeBase, KnowledgeBaseStats, LoadReport,
};
pub use pipeline::{
    ColumnMatch, ConfidenceThresholds, MatchingPipeline, RankedColumn, SheetMatch, StrategyRun,
};
pub use store::SchemaStore;
pub use strategies::{MatchStrategy, StrategyKind, default_strategies};
