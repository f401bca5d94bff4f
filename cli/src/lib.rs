//! Operations behind the `fieldkit` binary.
//!
//! A [`Workspace`] is one SQLite database holding metadata, schema documents
//! and the entity directory. Each operation runs as its own request with
//! fresh caches.

use anyhow::{Context, Result};
use fieldkit_engine::{
    EngineConfig, Env, FormSubmission, RenderRow, RequestCaches, Resolver, SavePipeline, SaveReport,
    TableBuilder,
};
use fieldkit_model::{ContentHost, EntityId, FieldGroup};
use fieldkit_store::{MetaAdapter, MetaStore, SqliteBackend};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Host view over the database's entity directory.
pub struct DbHost<'a> {
    db: &'a SqliteBackend,
}

impl<'a> DbHost<'a> {
    pub fn new(db: &'a SqliteBackend) -> Self {
        Self { db }
    }

    fn record(&self, id: EntityId) -> Option<fieldkit_store::EntityRecord> {
        match self.db.entity_record(id) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to look up entity {}: {}", id, e);
                None
            }
        }
    }
}

impl ContentHost for DbHost<'_> {
    fn content_type_of(&self, id: EntityId) -> Option<String> {
        self.record(id).map(|r| r.content_type)
    }

    fn status_of(&self, id: EntityId) -> Option<String> {
        self.record(id).map(|r| r.status)
    }
}

pub struct Workspace {
    db: Arc<SqliteBackend>,
    config: EngineConfig,
}

impl Workspace {
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        let path = path.as_ref();
        let db = SqliteBackend::open(path).with_context(|| format!("opening database {}", path.display()))?;
        Ok(Self {
            db: Arc::new(db),
            config,
        })
    }

    pub fn open_in_memory(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            db: Arc::new(SqliteBackend::open_in_memory()?),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stores a field-group document after checking that it parses.
    pub fn import_schema(&self, title: &str, conditions: &[String], body: &str, position: i64) -> Result<i64> {
        let groups: Vec<FieldGroup> = serde_json::from_str(body).context("parsing field groups")?;
        let id = self.db.save_schema_document(title, conditions, &groups, position)?;
        info!("Imported '{}' ({} groups) as document {}", title, groups.len(), id);
        Ok(id)
    }

    pub fn register(&self, id: EntityId, content_type: &str, status: &str) -> Result<()> {
        self.db.register_entity(id, content_type, status)?;
        Ok(())
    }

    /// Saves `(input name, value)` pairs through the store selected by `kind`.
    pub fn save(&self, id: EntityId, kind: &str, pairs: Vec<(String, String)>) -> Result<SaveReport> {
        let store = self.store(kind)?;
        let host = DbHost::new(&self.db);
        let env = Env::new(store.as_ref(), self.db.as_ref(), &host, &self.config);
        let form = FormSubmission::parse(&self.config.form_field, pairs);
        let mut caches = RequestCaches::new();
        let report = SavePipeline::new(env, &mut caches.schemas).save(id, &form)?;
        Ok(report)
    }

    /// Resolves one output, or the whole entity when `name` is `None`.
    /// An absent output is `null`.
    pub fn resolve(&self, id: EntityId, kind: Option<&str>, name: Option<&str>) -> Result<Value> {
        let kind = self.kind_of(id, kind)?;
        let store = self.store(&kind)?;
        let host = DbHost::new(&self.db);
        let env = Env::new(store.as_ref(), self.db.as_ref(), &host, &self.config);
        let mut caches = RequestCaches::new();
        let mut resolver = Resolver::new(env, &mut caches);
        let value = match name {
            Some(name) => serde_json::to_value(resolver.resolve_one(name, id)?)?,
            None => serde_json::to_value(resolver.resolve_all(id)?)?,
        };
        Ok(value)
    }

    pub fn rows(&self, id: EntityId, kind: Option<&str>) -> Result<Vec<RenderRow>> {
        let kind = self.kind_of(id, kind)?;
        let store = self.store(&kind)?;
        let host = DbHost::new(&self.db);
        let env = Env::new(store.as_ref(), self.db.as_ref(), &host, &self.config);
        let mut caches = RequestCaches::new();
        let rows = TableBuilder::new(env, &mut caches).expand_entity(id)?;
        Ok(rows)
    }

    fn store(&self, kind: &str) -> Result<Box<dyn MetaStore>> {
        let store = MetaAdapter::for_kind(kind, &self.config.entity_kinds(), self.db.clone())?;
        Ok(store)
    }

    /// An explicit kind, else the entity's registered content type.
    fn kind_of(&self, id: EntityId, kind: Option<&str>) -> Result<String> {
        if let Some(kind) = kind {
            return Ok(kind.to_string());
        }
        let record = self
            .db
            .entity_record(id)?
            .with_context(|| format!("entity {id} is not registered; pass --kind"))?;
        Ok(record.content_type)
    }
}
