//! Request-scoped memo tables.
//!
//! Each cache fills lazily on first access and is never invalidated; build a
//! fresh [`RequestCaches`] per request and let it drop at the end.

use fieldkit_model::{EntityId, FieldGroup, RawMetadata, RepeatCounts, ResolvedValue, Schema};
use fieldkit_store::{MetaStore, SchemaSource, StoreResult};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// Parsed schemas by content type.
#[derive(Debug, Default)]
pub struct SchemaCache {
    by_type: HashMap<String, Rc<Schema>>,
}

impl SchemaCache {
    pub fn get_or_load(&mut self, source: &dyn SchemaSource, content_type: &str) -> StoreResult<Rc<Schema>> {
        if let Some(schema) = self.by_type.get(content_type) {
            return Ok(Rc::clone(schema));
        }
        let schema = Rc::new(load_schema(source, content_type)?);
        self.by_type.insert(content_type.to_string(), Rc::clone(&schema));
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Concatenates the groups of every document attached to `content_type`.
///
/// A document whose body does not parse contributes nothing.
fn load_schema(source: &dyn SchemaSource, content_type: &str) -> StoreResult<Schema> {
    let mut groups = Vec::new();
    for document in source.documents(content_type)? {
        match serde_json::from_str::<Vec<FieldGroup>>(&document.body) {
            Ok(parsed) => groups.extend(parsed),
            Err(e) => warn!(
                "Skipping unreadable field settings '{}' (id {}): {}",
                document.title, document.id, e
            ),
        }
    }
    let schema = Schema::new(content_type, groups);
    for name in schema.duplicate_names() {
        warn!(
            "Field name '{}' is defined more than once for '{}'; the last definition wins",
            name, content_type
        );
    }
    debug!("Loaded {} field groups for '{}'", schema.groups.len(), content_type);
    Ok(schema)
}

/// Decoded repeat-count records by entity.
#[derive(Debug, Default)]
pub struct RepeatCountsCache {
    by_entity: HashMap<EntityId, Rc<RepeatCounts>>,
}

impl RepeatCountsCache {
    pub fn get_or_load(&mut self, store: &dyn MetaStore, key: &str, id: EntityId) -> StoreResult<Rc<RepeatCounts>> {
        if let Some(counts) = self.by_entity.get(&id) {
            return Ok(Rc::clone(counts));
        }
        let counts = Rc::new(decode_repeat_counts(store.get_single(id, key)?.as_deref(), id));
        self.by_entity.insert(id, Rc::clone(&counts));
        Ok(counts)
    }
}

fn decode_repeat_counts(raw: Option<&str>, id: EntityId) -> RepeatCounts {
    match raw {
        None | Some("") => RepeatCounts::default(),
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable repeat counts for entity {}: {}", id, e);
            RepeatCounts::default()
        }),
    }
}

/// Resolved values by entity and output name.
#[derive(Debug, Default)]
pub struct ResultCache {
    values: HashMap<(EntityId, String), ResolvedValue>,
}

impl ResultCache {
    pub fn get(&self, id: EntityId, name: &str) -> Option<&ResolvedValue> {
        self.values.get(&(id, name.to_string()))
    }

    pub fn insert(&mut self, id: EntityId, name: &str, value: ResolvedValue) {
        self.values.insert((id, name.to_string()), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Every stored key of an entity, as read once for form rendering.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    by_entity: HashMap<EntityId, Rc<RawMetadata>>,
}

impl SnapshotCache {
    pub fn get_or_load(&mut self, store: &dyn MetaStore, id: EntityId) -> StoreResult<Rc<RawMetadata>> {
        if let Some(meta) = self.by_entity.get(&id) {
            return Ok(Rc::clone(meta));
        }
        let meta = Rc::new(store.get_all(id)?);
        self.by_entity.insert(id, Rc::clone(&meta));
        Ok(meta)
    }
}

/// All memo tables of one request.
#[derive(Debug, Default)]
pub struct RequestCaches {
    pub schemas: SchemaCache,
    pub repeat_counts: RepeatCountsCache,
    pub results: ResultCache,
    pub snapshots: SnapshotCache,
}

impl RequestCaches {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_missing_or_empty_record() {
        assert!(decode_repeat_counts(None, EntityId::new(1)).is_empty());
        assert!(decode_repeat_counts(Some(""), EntityId::new(1)).is_empty());
    }

    #[test]
    fn decode_valid_record() {
        let counts = decode_repeat_counts(Some(r#"{"colors":[2,0,3]}"#), EntityId::new(1));
        assert_eq!(counts.get("colors"), Some(&[2, 0, 3][..]));
    }

    #[test]
    fn decode_garbage_is_empty() {
        assert!(decode_repeat_counts(Some("a:1:{}"), EntityId::new(1)).is_empty());
        assert!(decode_repeat_counts(Some(r#"{"colors":[-1]}"#), EntityId::new(1)).is_empty());
    }
}
