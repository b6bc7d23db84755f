//! Error types for the matching engine.
//!
//! Data-quality problems (unresolvable catalog references, a strategy that
//! fails on one column) are absorbed and logged. Only caller sequencing
//! problems, such as matching before a catalog is loaded, surface as errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by pipeline entry points.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MatchError {
    /// A lookup or match was attempted before any knowledge base was loaded.
    #[error("knowledge base is not loaded; load a catalog before matching")]
    NotLoaded,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),
}

/// Errors that reject a knowledge base snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeBaseError {
    #[error("catalog resolved to an empty schema ({models} models, {fields} fields)")]
    EmptyCatalog { models: usize, fields: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

/// Failure of a single strategy on a single column.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("invalid column profile '{column}': {message}")]
    InvalidProfile { column: String, message: String },
}

pub type Result<T> = std::result::Result<T, MatchError>;
