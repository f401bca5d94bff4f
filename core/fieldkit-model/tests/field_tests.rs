use fieldkit_model::{FieldDefinition, FieldType, choices_eol_to_array};

// ── FieldType ────────────────────────────────────────────────────

#[test]
fn known_names_map_to_variants() {
    assert_eq!(FieldType::from("text"), FieldType::Text);
    assert_eq!(FieldType::from("wysiwyg"), FieldType::Wysiwyg);
    assert_eq!(FieldType::from("relation"), FieldType::Relation);
    assert_eq!(FieldType::from("colorpicker"), FieldType::Colorpicker);
}

#[test]
fn rich_text_types() {
    assert!(FieldType::Textarea.is_rich_text());
    assert!(FieldType::Wysiwyg.is_rich_text());
    assert!(!FieldType::Text.is_rich_text());
}

#[test]
fn inherently_multiple_types() {
    assert!(FieldType::Check.is_inherently_multiple());
    assert!(FieldType::Relation.is_inherently_multiple());
    assert!(!FieldType::Radio.is_inherently_multiple());
    assert!(!FieldType::Other("map".into()).is_inherently_multiple());
}

#[test]
fn display_uses_schema_name() {
    assert_eq!(FieldType::Datepicker.to_string(), "datepicker");
    assert_eq!(FieldType::Other("map".into()).to_string(), "map");
}

// ── FieldDefinition ──────────────────────────────────────────────

#[test]
fn multiple_data_follows_type_unless_overridden() {
    assert!(FieldDefinition::check("c", "a").allows_multiple_data());
    assert!(!FieldDefinition::text("t").allows_multiple_data());
    assert!(FieldDefinition::text("t").with_multiple_data(true).allows_multiple_data());
    assert!(!FieldDefinition::relation("r").with_multiple_data(false).allows_multiple_data());
}

#[test]
fn label_falls_back_to_name() {
    assert_eq!(FieldDefinition::text("subtitle").display_label(), "subtitle");
    assert_eq!(
        FieldDefinition::text("subtitle").with_label("Sub title").display_label(),
        "Sub title"
    );
}

#[test]
fn default_choices_split_lines() {
    let f = FieldDefinition::check("colors", "red\nblue\ngreen").with_default("red\r\nblue");
    assert!(f.has_default());
    assert_eq!(f.default_choices(), vec!["red", "blue"]);
}

// ── choices_eol_to_array ─────────────────────────────────────────

#[test]
fn accepts_every_line_break_convention() {
    assert_eq!(choices_eol_to_array("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
}

#[test]
fn trims_and_drops_blank_lines() {
    assert_eq!(choices_eol_to_array("  a \n\n  \n b"), vec!["a", "b"]);
}

#[test]
fn empty_input_gives_empty_list() {
    assert!(choices_eol_to_array("").is_empty());
}
