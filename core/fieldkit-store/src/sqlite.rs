//! SQLite-backed metadata, schema documents and entity directory.
//!
//! One database file holds the two metadata tables, the stored field-group
//! documents, and the minimal entity directory the CLI host reads content
//! types and publication statuses from.

use crate::backend::{MetaBackend, MetaTable};
use crate::schema_source::{SchemaDocument, SchemaSource};
use crate::{StoreError, StoreResult};
use fieldkit_model::{EntityId, FieldGroup, MetaId, RawMetadata};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Content type and publication status of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub content_type: String,
    pub status: String,
}

/// Persistent metadata store backed by SQLite.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened metadata database at {:?}", path.as_ref());
        Self::with_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS content_meta (
                meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_id INTEGER NOT NULL,
                meta_key TEXT NOT NULL,
                meta_value TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS content_meta_lookup ON content_meta (entity_id, meta_key);

            CREATE TABLE IF NOT EXISTS account_meta (
                meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_id INTEGER NOT NULL,
                meta_key TEXT NOT NULL,
                meta_value TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS account_meta_lookup ON account_meta (entity_id, meta_key);

            CREATE TABLE IF NOT EXISTS field_settings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                conditions TEXT NOT NULL,
                body TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS entities (
                entity_id INTEGER PRIMARY KEY,
                content_type TEXT NOT NULL,
                status TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    // ── Schema documents ─────────────────────────────────────────

    /// Stores a field-group document that applies to every content type in
    /// `conditions`. Returns the document id.
    pub fn save_schema_document(
        &self,
        title: &str,
        conditions: &[String],
        groups: &[FieldGroup],
        position: i64,
    ) -> StoreResult<i64> {
        let conditions = serde_json::to_string(conditions)?;
        let body = serde_json::to_string(groups)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO field_settings (title, conditions, body, position) VALUES (?1, ?2, ?3, ?4)",
            params![title, conditions, body, position],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // ── Entity directory ─────────────────────────────────────────

    /// Records (or replaces) the content type and status of an entity.
    pub fn register_entity(&self, id: EntityId, content_type: &str, status: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO entities (entity_id, content_type, status) VALUES (?1, ?2, ?3)",
            params![sql_id(id)?, content_type, status],
        )?;
        Ok(())
    }

    pub fn entity_record(&self, id: EntityId) -> StoreResult<Option<EntityRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT content_type, status FROM entities WHERE entity_id = ?1",
                params![sql_id(id)?],
                |row| {
                    Ok(EntityRecord {
                        id,
                        content_type: row.get(0)?,
                        status: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

fn sql_id(id: EntityId) -> StoreResult<i64> {
    i64::try_from(id.get()).map_err(|_| StoreError::InvalidData(format!("entity id {id} out of range")))
}

impl MetaBackend for SqliteBackend {
    fn fetch(&self, table: MetaTable, id: EntityId, key: &str) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT meta_value FROM {} WHERE entity_id = ?1 AND meta_key = ?2 ORDER BY meta_id",
            table.table_name()
        ))?;
        let values = stmt
            .query_map(params![sql_id(id)?, key], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    fn fetch_all(&self, table: MetaTable, id: EntityId) -> StoreResult<RawMetadata> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT meta_key, meta_value FROM {} WHERE entity_id = ?1 ORDER BY meta_id",
            table.table_name()
        ))?;
        let rows = stmt
            .query_map(params![sql_id(id)?], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().collect())
    }

    fn insert(&self, table: MetaTable, id: EntityId, key: &str, value: &str) -> StoreResult<MetaId> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (entity_id, meta_key, meta_value) VALUES (?1, ?2, ?3)",
                table.table_name()
            ),
            params![sql_id(id)?, key, value],
        )?;
        Ok(MetaId::new(conn.last_insert_rowid()))
    }

    fn replace(
        &self,
        table: MetaTable,
        id: EntityId,
        key: &str,
        value: &str,
        prev: Option<&str>,
    ) -> StoreResult<usize> {
        let conn = self.conn()?;
        let changed = match prev {
            Some(prev) => conn.execute(
                &format!(
                    "UPDATE {} SET meta_value = ?1 WHERE entity_id = ?2 AND meta_key = ?3 AND meta_value = ?4",
                    table.table_name()
                ),
                params![value, sql_id(id)?, key, prev],
            )?,
            None => conn.execute(
                &format!(
                    "UPDATE {} SET meta_value = ?1 WHERE entity_id = ?2 AND meta_key = ?3",
                    table.table_name()
                ),
                params![value, sql_id(id)?, key],
            )?,
        };
        Ok(changed)
    }

    fn remove(&self, table: MetaTable, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<usize> {
        let conn = self.conn()?;
        let removed = match value {
            Some(value) => conn.execute(
                &format!(
                    "DELETE FROM {} WHERE entity_id = ?1 AND meta_key = ?2 AND meta_value = ?3",
                    table.table_name()
                ),
                params![sql_id(id)?, key, value],
            )?,
            None => conn.execute(
                &format!(
                    "DELETE FROM {} WHERE entity_id = ?1 AND meta_key = ?2",
                    table.table_name()
                ),
                params![sql_id(id)?, key],
            )?,
        };
        Ok(removed)
    }
}

impl SchemaSource for SqliteBackend {
    fn documents(&self, content_type: &str) -> StoreResult<Vec<SchemaDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, conditions, body FROM field_settings ORDER BY position, id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut documents = Vec::new();
        for (id, title, conditions, body) in rows {
            let conditions: Vec<String> = match serde_json::from_str(&conditions) {
                Ok(conditions) => conditions,
                Err(e) => {
                    warn!("Skipping field settings '{}' (id {}): unreadable conditions: {}", title, id, e);
                    continue;
                }
            };
            let document = SchemaDocument {
                id,
                title,
                conditions,
                body,
            };
            if document.applies_to(content_type) {
                documents.push(document);
            }
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_model::FieldDefinition;

    #[test]
    fn unreadable_conditions_skip_only_that_document() {
        let db = SqliteBackend::open_in_memory().unwrap();
        let groups = vec![FieldGroup::single(vec![FieldDefinition::text("headline")])];
        db.save_schema_document("Good", &["post".into()], &groups, 0).unwrap();
        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO field_settings (title, conditions, body, position) VALUES ('Bad', 'post', '[]', 1)",
                [],
            )
            .unwrap();

        let docs = db.documents("post").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Good");
    }
}
