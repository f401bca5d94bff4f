//! The metadata store adapter.
//!
//! Content items and accounts keep their metadata in separate host tables.
//! The adapter decides which one an entity kind maps to when it is built, so
//! callers only ever see the [`MetaStore`] contract.

use crate::backend::{MetaBackend, MetaTable};
use crate::{StoreError, StoreResult};
use fieldkit_model::{EntityId, MetaId, RawMetadata};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Uniform per-entity key-value metadata access.
pub trait MetaStore {
    /// Every value stored under `key`, in insertion order.
    fn get(&self, id: EntityId, key: &str) -> StoreResult<Vec<String>>;

    /// The first value stored under `key`, if any.
    fn get_single(&self, id: EntityId, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get(id, key)?.into_iter().next())
    }

    /// Every key of the entity with its values.
    fn get_all(&self, id: EntityId) -> StoreResult<RawMetadata>;

    /// Appends a value. With `unique`, refuses (returns `None`) when the key
    /// already holds a value.
    fn add(&self, id: EntityId, key: &str, value: &str, unique: bool) -> StoreResult<Option<MetaId>>;

    /// Rewrites the values of `key`, or only those equal to `prev_value`.
    /// A missing key is added when no `prev_value` is given.
    fn update(&self, id: EntityId, key: &str, value: &str, prev_value: Option<&str>) -> StoreResult<bool>;

    /// Removes the values of `key`, or only those equal to `value`.
    fn delete(&self, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<bool>;
}

/// Which host table an entity kind reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Content,
    Account,
}

/// The content types and account roles the adapter accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKinds {
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub account_roles: Vec<String>,
}

impl EntityKinds {
    /// Content types take precedence over account roles of the same name.
    pub fn classify(&self, kind: &str) -> Option<EntityKind> {
        if self.content_types.iter().any(|t| t == kind) {
            Some(EntityKind::Content)
        } else if self.account_roles.iter().any(|r| r == kind) {
            Some(EntityKind::Account)
        } else {
            None
        }
    }
}

/// Builds the right [`MetaStore`] for an entity kind.
pub struct MetaAdapter;

impl MetaAdapter {
    /// Selects the content or account store for `kind`.
    ///
    /// An unrecognised kind is a broken call site, reported as
    /// [`StoreError::UnknownEntityKind`].
    pub fn for_kind(
        kind: &str,
        kinds: &EntityKinds,
        backend: Arc<dyn MetaBackend>,
    ) -> StoreResult<Box<dyn MetaStore>> {
        match kinds.classify(kind) {
            Some(EntityKind::Content) => {
                debug!("Using content metadata store for kind '{}'", kind);
                Ok(Box::new(ContentMetaStore::new(backend)))
            }
            Some(EntityKind::Account) => {
                debug!("Using account metadata store for kind '{}'", kind);
                Ok(Box::new(AccountMetaStore::new(backend)))
            }
            None => Err(StoreError::UnknownEntityKind(kind.to_string())),
        }
    }
}

/// Shared implementation over one table.
struct TableStore {
    backend: Arc<dyn MetaBackend>,
    table: MetaTable,
}

impl TableStore {
    fn get(&self, id: EntityId, key: &str) -> StoreResult<Vec<String>> {
        self.backend.fetch(self.table, id, key)
    }

    fn get_all(&self, id: EntityId) -> StoreResult<RawMetadata> {
        self.backend.fetch_all(self.table, id)
    }

    fn add(&self, id: EntityId, key: &str, value: &str, unique: bool) -> StoreResult<Option<MetaId>> {
        if unique && !self.backend.fetch(self.table, id, key)?.is_empty() {
            return Ok(None);
        }
        self.backend.insert(self.table, id, key, value).map(Some)
    }

    fn update(&self, id: EntityId, key: &str, value: &str, prev_value: Option<&str>) -> StoreResult<bool> {
        if prev_value.is_none() && self.backend.fetch(self.table, id, key)?.is_empty() {
            self.backend.insert(self.table, id, key, value)?;
            return Ok(true);
        }
        Ok(self.backend.replace(self.table, id, key, value, prev_value)? > 0)
    }

    fn delete(&self, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<bool> {
        Ok(self.backend.remove(self.table, id, key, value)? > 0)
    }
}

/// Metadata of content items.
pub struct ContentMetaStore(TableStore);

impl ContentMetaStore {
    pub fn new(backend: Arc<dyn MetaBackend>) -> Self {
        Self(TableStore {
            backend,
            table: MetaTable::Content,
        })
    }
}

impl MetaStore for ContentMetaStore {
    fn get(&self, id: EntityId, key: &str) -> StoreResult<Vec<String>> {
        self.0.get(id, key)
    }

    fn get_all(&self, id: EntityId) -> StoreResult<RawMetadata> {
        self.0.get_all(id)
    }

    fn add(&self, id: EntityId, key: &str, value: &str, unique: bool) -> StoreResult<Option<MetaId>> {
        self.0.add(id, key, value, unique)
    }

    fn update(&self, id: EntityId, key: &str, value: &str, prev_value: Option<&str>) -> StoreResult<bool> {
        self.0.update(id, key, value, prev_value)
    }

    fn delete(&self, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<bool> {
        self.0.delete(id, key, value)
    }
}

/// Metadata of user accounts.
pub struct AccountMetaStore(TableStore);

impl AccountMetaStore {
    pub fn new(backend: Arc<dyn MetaBackend>) -> Self {
        Self(TableStore {
            backend,
            table: MetaTable::Account,
        })
    }
}

impl MetaStore for AccountMetaStore {
    fn get(&self, id: EntityId, key: &str) -> StoreResult<Vec<String>> {
        self.0.get(id, key)
    }

    fn get_all(&self, id: EntityId) -> StoreResult<RawMetadata> {
        self.0.get_all(id)
    }

    fn add(&self, id: EntityId, key: &str, value: &str, unique: bool) -> StoreResult<Option<MetaId>> {
        self.0.add(id, key, value, unique)
    }

    fn update(&self, id: EntityId, key: &str, value: &str, prev_value: Option<&str>) -> StoreResult<bool> {
        self.0.update(id, key, value, prev_value)
    }

    fn delete(&self, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<bool> {
        self.0.delete(id, key, value)
    }
}
