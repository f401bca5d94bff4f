use fieldkit_model::{FieldDefinition, FieldGroup};
use fieldkit_store::{MemorySchemaSource, SchemaSource};

#[test]
fn memory_source_filters_and_keeps_order() {
    let mut source = MemorySchemaSource::new();
    let groups = vec![FieldGroup::single(vec![FieldDefinition::text("a")])];
    source.add("one", &["post"], &groups).unwrap();
    source.add("two", &["page"], &groups).unwrap();
    source.add_raw("three", &["post", "page"], "not json");

    let post_docs = source.documents("post").unwrap();
    let titles: Vec<&str> = post_docs.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "three"]);
    assert_eq!(post_docs[1].body, "not json");
}

#[test]
fn condition_match_is_exact() {
    let mut source = MemorySchemaSource::new();
    source.add_raw("posts", &["post"], "[]");
    assert!(source.documents("pos").unwrap().is_empty());
    assert!(source.documents("posts").unwrap().is_empty());
}
