use crate::StoreResult;
use fieldkit_model::FieldGroup;
use serde::{Deserialize, Serialize};

/// One stored field-group document, as written by the admin screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub id: i64,
    pub title: String,
    /// Content types this document is attached to.
    pub conditions: Vec<String>,
    /// JSON array of field groups; parsed by the engine's schema cache.
    pub body: String,
}

impl SchemaDocument {
    pub fn applies_to(&self, content_type: &str) -> bool {
        self.conditions.iter().any(|c| c == content_type)
    }
}

/// Read access to the stored schema documents.
pub trait SchemaSource {
    /// Documents attached to `content_type`, in display order.
    fn documents(&self, content_type: &str) -> StoreResult<Vec<SchemaDocument>>;
}

/// Schema documents held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaSource {
    documents: Vec<SchemaDocument>,
}

impl MemorySchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document serialized from `groups`.
    pub fn add(&mut self, title: &str, conditions: &[&str], groups: &[FieldGroup]) -> StoreResult<i64> {
        let body = serde_json::to_string(groups)?;
        Ok(self.add_raw(title, conditions, body))
    }

    /// Adds a document with a verbatim body, which need not be valid JSON.
    pub fn add_raw(&mut self, title: &str, conditions: &[&str], body: impl Into<String>) -> i64 {
        let id = self.documents.len() as i64 + 1;
        self.documents.push(SchemaDocument {
            id,
            title: title.to_string(),
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            body: body.into(),
        });
        id
    }
}

impl SchemaSource for MemorySchemaSource {
    fn documents(&self, content_type: &str) -> StoreResult<Vec<SchemaDocument>> {
        Ok(self
            .documents
            .iter()
            .filter(|d| d.applies_to(content_type))
            .cloned()
            .collect())
    }
}
