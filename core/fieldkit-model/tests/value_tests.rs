use fieldkit_model::{Iteration, ResolvedValue};
use serde_json::json;

fn iteration(pairs: &[(&str, ResolvedValue)]) -> Iteration {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

// ── Accessors ────────────────────────────────────────────────────

#[test]
fn accessors_match_variant() {
    let single = ResolvedValue::from("Hello");
    assert_eq!(single.as_str(), Some("Hello"));
    assert!(single.as_list().is_none());

    let list = ResolvedValue::from(vec!["5".to_string(), "9".to_string()]);
    assert_eq!(list.as_list().map(|l| l.len()), Some(2));
    assert!(list.as_iterations().is_none());
}

#[test]
fn emptiness() {
    assert!(ResolvedValue::from("").is_empty());
    assert!(ResolvedValue::Multiple(vec![]).is_empty());
    assert!(ResolvedValue::Group(vec![]).is_empty());
    assert!(!ResolvedValue::Group(vec![Iteration::new()]).is_empty());
}

// ── Serde shape ──────────────────────────────────────────────────

#[test]
fn serializes_as_plain_json() {
    let group = ResolvedValue::Group(vec![
        iteration(&[("caption", "one".into()), ("colors", vec!["red".to_string()].into())]),
        iteration(&[("caption", "two".into()), ("colors", ResolvedValue::Multiple(vec![]))]),
    ]);
    assert_eq!(
        serde_json::to_value(&group).unwrap(),
        json!([
            {"caption": "one", "colors": ["red"]},
            {"caption": "two", "colors": []}
        ])
    );
}

#[test]
fn deserializes_each_shape() {
    let single: ResolvedValue = serde_json::from_value(json!("x")).unwrap();
    assert_eq!(single, ResolvedValue::from("x"));

    let list: ResolvedValue = serde_json::from_value(json!(["a", "b"])).unwrap();
    assert_eq!(list.as_list().unwrap(), ["a".to_string(), "b".to_string()]);

    let group: ResolvedValue = serde_json::from_value(json!([{"caption": "c"}])).unwrap();
    assert_eq!(group.as_iterations().unwrap().len(), 1);
}
