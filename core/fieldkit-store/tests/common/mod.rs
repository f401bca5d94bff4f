//! Shared test helpers for store tests.

#![allow(dead_code)]

use fieldkit_store::{EntityKinds, MemoryBackend, MetaBackend, SqliteBackend};
use std::sync::Arc;

/// Both backends, so every adapter test runs against each.
pub fn backends() -> Vec<(&'static str, Arc<dyn MetaBackend>)> {
    vec![
        ("memory", Arc::new(MemoryBackend::new())),
        ("sqlite", Arc::new(SqliteBackend::open_in_memory().unwrap())),
    ]
}

pub fn kinds() -> EntityKinds {
    EntityKinds {
        content_types: vec!["post".into(), "page".into()],
        account_roles: vec!["administrator".into(), "editor".into()],
    }
}
