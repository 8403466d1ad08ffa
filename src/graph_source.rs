//! Graph-fetch seam for the external graph store.
//!
//! The engine never owns persistence. A [`GraphSource`] hands back the raw
//! subgraph document for an entity — canonical or tree-shaped, the
//! normalizer deals with either — and any backend failure is wrapped in
//! [`AnalysisError::GraphSource`] with no retry here (retry policy belongs
//! to the embedding application).
//!
//! [`InMemoryGraphSource`] backs tests and the CLI. A store-backed
//! implementation would be constructed from [`crate::config::GraphSettings`]
//! by the embedding application.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::AnalysisError;

/// Capability to fetch a subgraph for a given entity id and traversal depth.
pub trait GraphSource {
    /// Fetch the raw subgraph document centered on `entity_id`.
    ///
    /// Returns `Value::Null` when the entity is unknown — "no data" is not
    /// an error; the analyzers simply find nothing to flag.
    fn fetch_subgraph(&self, entity_id: &str, depth: u32) -> Result<Value, AnalysisError>;
}

/// Graph source holding raw subgraph documents in memory, keyed by entity id.
#[derive(Debug, Default)]
pub struct InMemoryGraphSource {
    documents: HashMap<String, Value>,
}

impl InMemoryGraphSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the subgraph document returned for `entity_id`.
    pub fn insert(&mut self, entity_id: &str, document: Value) {
        self.documents.insert(entity_id.to_string(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl GraphSource for InMemoryGraphSource {
    fn fetch_subgraph(&self, entity_id: &str, _depth: u32) -> Result<Value, AnalysisError> {
        Ok(self
            .documents
            .get(entity_id)
            .cloned()
            .unwrap_or(Value::Null))
    }
}
