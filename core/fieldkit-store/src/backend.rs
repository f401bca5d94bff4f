use crate::StoreResult;
use fieldkit_model::{EntityId, MetaId, RawMetadata};

/// The host table a metadata row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaTable {
    Content,
    Account,
}

impl MetaTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Content => "content_meta",
            Self::Account => "account_meta",
        }
    }
}

/// Row-level storage shared by the content and account stores.
///
/// Values under one key keep insertion order; that order is what the
/// repeat-count record slices against.
pub trait MetaBackend: Send + Sync {
    /// Values stored under `key`, in insertion order.
    fn fetch(&self, table: MetaTable, id: EntityId, key: &str) -> StoreResult<Vec<String>>;

    /// Every key of `id` with its values.
    fn fetch_all(&self, table: MetaTable, id: EntityId) -> StoreResult<RawMetadata>;

    /// Appends a value and returns its row id.
    fn insert(&self, table: MetaTable, id: EntityId, key: &str, value: &str) -> StoreResult<MetaId>;

    /// Rewrites values under `key` (only those equal to `prev` when given).
    /// Returns the number of rows changed.
    fn replace(
        &self,
        table: MetaTable,
        id: EntityId,
        key: &str,
        value: &str,
        prev: Option<&str>,
    ) -> StoreResult<usize>;

    /// Removes values under `key` (only those equal to `value` when given).
    /// Returns the number of rows removed.
    fn remove(&self, table: MetaTable, id: EntityId, key: &str, value: Option<&str>) -> StoreResult<usize>;
}
