//! Shared fixture for engine tests.

#![allow(dead_code)]

use fieldkit_engine::{EngineConfig, Env};
use fieldkit_model::{ContentHost, EntityId, FieldGroup};
use fieldkit_store::{ContentMetaStore, MemoryBackend, MemorySchemaSource, MetaStore};
use std::collections::HashMap;
use std::sync::Arc;

pub const POST: EntityId = EntityId::new(1);
/// A preview request that maps onto [`POST`].
pub const PREVIEW: EntityId = EntityId::new(100);
/// An entity the host knows nothing about.
pub const STRANGER: EntityId = EntityId::new(404);

/// Host double: content types, statuses and preview mapping from maps;
/// rich text is wrapped in a paragraph.
#[derive(Default)]
pub struct TestHost {
    pub types: HashMap<EntityId, String>,
    pub statuses: HashMap<EntityId, String>,
    pub previews: HashMap<EntityId, EntityId>,
}

impl ContentHost for TestHost {
    fn canonical_id(&self, id: EntityId) -> EntityId {
        self.previews.get(&id).copied().unwrap_or(id)
    }

    fn content_type_of(&self, id: EntityId) -> Option<String> {
        self.types.get(&id).cloned()
    }

    fn status_of(&self, id: EntityId) -> Option<String> {
        self.statuses.get(&id).cloned()
    }

    fn transform_content(&self, text: &str) -> String {
        format!("<p>{text}</p>")
    }
}

pub struct Fixture {
    pub backend: Arc<MemoryBackend>,
    pub store: ContentMetaStore,
    pub schemas: MemorySchemaSource,
    pub host: TestHost,
    pub config: EngineConfig,
}

impl Fixture {
    /// A fixture where [`POST`] is a "post" whose schema is `groups`.
    /// Entities 5 and 9 are published, 7 is a draft.
    pub fn new(groups: Vec<FieldGroup>) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let store = ContentMetaStore::new(backend.clone());
        let mut schemas = MemorySchemaSource::new();
        schemas.add("Post fields", &["post"], &groups).unwrap();

        let mut host = TestHost::default();
        host.types.insert(POST, "post".into());
        host.statuses.insert(POST, "publish".into());
        host.previews.insert(PREVIEW, POST);
        for (id, status) in [(5, "publish"), (7, "draft"), (9, "publish")] {
            host.statuses.insert(EntityId::new(id), status.into());
        }

        Self {
            backend,
            store,
            schemas,
            host,
            config: EngineConfig::default(),
        }
    }

    pub fn env(&self) -> Env<'_> {
        Env::new(&self.store, &self.schemas, &self.host, &self.config)
    }

    /// Appends raw values under `key`.
    pub fn seed(&self, id: EntityId, key: &str, values: &[&str]) {
        for value in values {
            self.store.add(id, key, value, false).unwrap();
        }
    }

    /// Writes the repeat-count record verbatim.
    pub fn seed_counts(&self, id: EntityId, json: &str) {
        let key = self.config.repeat_counts_key();
        self.store.delete(id, &key, None).unwrap();
        self.store.add(id, &key, json, true).unwrap();
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
