//! Metadata storage for fieldkit.
//!
//! Provides the uniform key-value contract the engine reads and writes
//! through, regardless of whether the entity is a content item or an account.
//!
//! # Architecture
//!
//! - [`MetaStore`] is the `(entity_id, key) -> list<string>` contract
//! - [`ContentMetaStore`] and [`AccountMetaStore`] address the two host tables;
//!   [`MetaAdapter::for_kind`] picks one once, from the entity kind
//! - [`MetaBackend`] is the row store underneath: [`MemoryBackend`] for tests
//!   and embedding, [`SqliteBackend`] for durable storage
//! - [`SchemaSource`] yields the stored field-group documents for a content type

mod adapter;
mod backend;
mod error;
mod memory;
mod schema_source;
mod sqlite;

pub use adapter::{AccountMetaStore, ContentMetaStore, EntityKind, EntityKinds, MetaAdapter, MetaStore};
pub use backend::{MetaBackend, MetaTable};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use schema_source::{MemorySchemaSource, SchemaDocument, SchemaSource};
pub use sqlite::{EntityRecord, SqliteBackend};
