//! Shared holder for the current knowledge base snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use fieldmatch_model::Catalog;
use tracing::{info, warn};

use crate::error::{KnowledgeBaseError, MatchError};
use crate::knowledge_base::{KnowledgeBase, LoadReport};

/// Holds at most one loaded [`KnowledgeBase`].
///
/// Readers clone the `Arc` of the current snapshot and keep using it for the
/// whole of their request. A reload builds the replacement without holding
/// the lock and swaps it in with a single write; a reload that resolves to
/// an empty schema is rejected and the previous snapshot stays current.
#[derive(Debug, Default)]
pub struct SchemaStore {
    current: RwLock<Option<Arc<KnowledgeBase>>>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `knowledge_base`.
    pub fn with_knowledge_base(knowledge_base: KnowledgeBase) -> Result<Self, KnowledgeBaseError> {
        let store = Self::new();
        store.install(knowledge_base)?;
        Ok(store)
    }

    /// Resolve `catalog` and make it the current snapshot.
    pub fn reload(&self, catalog: &Catalog) -> Result<LoadReport, KnowledgeBaseError> {
        let (knowledge_base, report) = KnowledgeBase::load(catalog);
        self.install(knowledge_base)?;
        Ok(report)
    }

    /// Swap in a prebuilt knowledge base.
    pub fn install(&self, knowledge_base: KnowledgeBase) -> Result<(), KnowledgeBaseError> {
        if knowledge_base.is_empty() {
            let error = KnowledgeBaseError::EmptyCatalog {
                models: knowledge_base.model_count(),
                fields: knowledge_base.field_count(),
            };
            warn!(%error, "keeping previous knowledge base");
            return Err(error);
        }
        let models = knowledge_base.model_count();
        let fields = knowledge_base.field_count();
        let snapshot = Arc::new(knowledge_base);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        info!(models, fields, "knowledge base snapshot installed");
        Ok(())
    }

    /// The current snapshot, or [`MatchError::NotLoaded`].
    pub fn snapshot(&self) -> Result<Arc<KnowledgeBase>, MatchError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(MatchError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
