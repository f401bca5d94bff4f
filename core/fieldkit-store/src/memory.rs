//! In-process metadata backend.

use crate::backend::{MetaBackend, MetaTable};
use crate::{StoreError, StoreResult};
use fieldkit_model::{EntityId, MetaId, RawMetadata};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct MetaRow {
    table: MetaTable,
    entity: EntityId,
    key: String,
    value: String,
}

impl MetaRow {
    fn matches(&self, table: MetaTable, entity: EntityId, key: &str) -> bool {
        self.table == table && self.entity == entity && self.key == key
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<MetaRow>,
    last_id: i64,
}

/// Metadata rows held in memory, ordered by insertion.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored rows across both tables.
    pub fn row_count(&self) -> usize {
        self.state.lock().map(|s| s.rows.len()).unwrap_or(0)
    }

    fn state(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl MetaBackend for MemoryBackend {
    fn fetch(&self, table: MetaTable, id: EntityId, key: &str) -> StoreResult<Vec<String>> {
        let state = self.state()?;
        Ok(state
            .rows
            .iter()
            .filter(|r| r.matches(table, id, key))
            .map(|r| r.value.clone())
            .collect())
    }

    fn fetch_all(&self, table: MetaTable, id: EntityId) -> StoreResult<RawMetadata> {
        let state = self.state()?;
        Ok(state
            .rows
            .iter()
            .filter(|r| r.table == table && r.entity == id)
            .map(|r| (r.key.clone(), r.value.clone()))
            .collect())
    }

    fn insert(&self, table: MetaTable, id: EntityId, key: &str, value: &str) -> StoreResult<MetaId> {
        let mut state = self.state()?;
        state.last_id += 1;
        let meta_id = MetaId::new(state.last_id);
        state.rows.push(MetaRow {
            table,
            entity: id,
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(meta_id)
    }

    fn replace(
        &self,
        table: MetaTable,
        id: EntityId,
        key: &str,
        value: &str,
        prev: Option<&str>,
    ) -> StoreResult<usize> {
        let mut state = self.state()?;
        let mut changed = 0;
        for row in state.rows.iter_mut().filter(|r| r.matches(table, id, key)) {
            if prev.is_some_and(|p| p != row.value) {
                continue;
            }
            row.value = value.to_string();
            changed += 1;
        }
        Ok(changed)
    }

    fn remove(&self, table: MetaTable, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<usize> {
        let mut state = self.state()?;
        let before = state.rows.len();
        state.rows.retain(|r| {
            !(r.matches(table, id, key) && value.is_none_or(|v| v == r.value))
        });
        Ok(before - state.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_ids_increase() {
        let backend = MemoryBackend::new();
        let a = backend.insert(MetaTable::Content, EntityId::new(1), "k", "a").unwrap();
        let b = backend.insert(MetaTable::Content, EntityId::new(1), "k", "b").unwrap();
        assert!(b > a);
        assert_eq!(
            backend.fetch(MetaTable::Content, EntityId::new(1), "k").unwrap(),
            vec!["a", "b"]
        );
    }
}
