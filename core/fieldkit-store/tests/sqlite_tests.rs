use fieldkit_model::{EntityId, FieldDefinition, FieldGroup};
use fieldkit_store::{ContentMetaStore, MetaStore, SchemaSource, SqliteBackend};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// ── Persistence ──────────────────────────────────────────────────

#[test]
fn metadata_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.db");

    {
        let backend = Arc::new(SqliteBackend::open(&path).unwrap());
        let store = ContentMetaStore::new(backend);
        store.add(EntityId::new(1), "headline", "Hello", false).unwrap();
    }

    let backend = Arc::new(SqliteBackend::open(&path).unwrap());
    let store = ContentMetaStore::new(backend);
    assert_eq!(store.get(EntityId::new(1), "headline").unwrap(), vec!["Hello"]);
}

#[test]
fn out_of_range_id_is_invalid_data() {
    let backend = Arc::new(SqliteBackend::open_in_memory().unwrap());
    let store = ContentMetaStore::new(backend);
    assert!(store.get(EntityId::new(u64::MAX), "k").is_err());
}

// ── Schema documents ─────────────────────────────────────────────

#[test]
fn documents_filter_by_exact_condition() {
    let db = SqliteBackend::open_in_memory().unwrap();
    let groups = vec![FieldGroup::single(vec![FieldDefinition::text("headline")])];
    db.save_schema_document("Posts", &["post".into()], &groups, 0).unwrap();
    db.save_schema_document("Pages", &["page".into(), "post-archive".into()], &groups, 0)
        .unwrap();

    let docs = db.documents("post").unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Posts");
    assert!(db.documents("attachment").unwrap().is_empty());
}

#[test]
fn documents_ordered_by_position_then_id() {
    let db = SqliteBackend::open_in_memory().unwrap();
    let groups: Vec<FieldGroup> = Vec::new();
    db.save_schema_document("second", &["post".into()], &groups, 5).unwrap();
    db.save_schema_document("first", &["post".into()], &groups, 1).unwrap();
    db.save_schema_document("third", &["post".into()], &groups, 5).unwrap();

    let titles: Vec<String> = db.documents("post").unwrap().into_iter().map(|d| d.title).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[test]
fn document_body_roundtrips_groups() {
    let db = SqliteBackend::open_in_memory().unwrap();
    let groups = vec![FieldGroup::repeatable(
        "slides",
        vec![FieldDefinition::check("colors", "red\nblue")],
    )];
    db.save_schema_document("Slides", &["post".into()], &groups, 0).unwrap();

    let doc = db.documents("post").unwrap().remove(0);
    let parsed: Vec<FieldGroup> = serde_json::from_str(&doc.body).unwrap();
    assert_eq!(parsed, groups);
}

// ── Entity directory ─────────────────────────────────────────────

#[test]
fn register_and_read_entity() {
    let db = SqliteBackend::open_in_memory().unwrap();
    db.register_entity(EntityId::new(5), "post", "publish").unwrap();
    db.register_entity(EntityId::new(5), "post", "draft").unwrap();

    let record = db.entity_record(EntityId::new(5)).unwrap().unwrap();
    assert_eq!(record.content_type, "post");
    assert_eq!(record.status, "draft");
    assert!(db.entity_record(EntityId::new(6)).unwrap().is_none());
}
