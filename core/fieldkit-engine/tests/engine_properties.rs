//! Property-based tests for resolution.
//!
//! - Partitioning by repeat counts loses nothing when the record is consistent
//!   and never panics when it is not
//! - Whatever a form saves into a repeatable group resolves back per iteration
//! - Resolving twice in one request gives the same answer

mod common;

use common::{Fixture, POST};
use fieldkit_engine::{FormSubmission, RequestCaches, Resolver, SavePipeline};
use fieldkit_model::{FieldDefinition, FieldGroup, ResolvedValue, partition_by_counts};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").unwrap()
}

fn counts_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..5, 0..8)
}

/// Per-iteration checkbox selections.
fn iterations_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(value_strategy(), 0..4), 1..6)
}

fn gallery() -> Vec<FieldGroup> {
    vec![FieldGroup::repeatable(
        "gallery",
        vec![
            FieldDefinition::text("caption"),
            FieldDefinition::check("tags", ""),
        ],
    )]
}

// =============================================================================
// PARTITION PROPERTIES
// =============================================================================

proptest! {
    /// A consistent record splits the values exactly.
    #[test]
    fn consistent_counts_partition_exactly(counts in counts_strategy()) {
        let total: usize = counts.iter().sum();
        let values: Vec<String> = (0..total).map(|i| i.to_string()).collect();

        let parts = partition_by_counts(&values, &counts);

        prop_assert_eq!(parts.len(), counts.len());
        for (part, count) in parts.iter().zip(&counts) {
            prop_assert_eq!(part.len(), *count);
        }
        prop_assert_eq!(parts.concat(), values);
    }

    /// An inconsistent record still yields one in-order slice per count.
    #[test]
    fn mismatched_counts_are_clamped(
        counts in counts_strategy(),
        values in prop::collection::vec(value_strategy(), 0..12),
    ) {
        let parts = partition_by_counts(&values, &counts);

        prop_assert_eq!(parts.len(), counts.len());
        let flattened = parts.concat();
        prop_assert!(flattened.len() <= values.len());
        prop_assert_eq!(&values[..flattened.len()], &flattened[..]);
    }
}

// =============================================================================
// SAVE / RESOLVE PROPERTIES
// =============================================================================

proptest! {
    /// Checkbox selections saved per iteration resolve to the same iterations.
    #[test]
    fn saved_iterations_resolve_back(iterations in iterations_strategy()) {
        let fx = Fixture::new(gallery());
        let mut pairs = Vec::new();
        for (i, tags) in iterations.iter().enumerate() {
            pairs.push((format!("smart-custom-fields[caption][{i}]"), format!("row {i}")));
            for tag in tags {
                pairs.push((format!("smart-custom-fields[tags][{i}][]"), tag.clone()));
            }
        }
        let form = FormSubmission::parse(&fx.config.form_field, pairs);

        let mut caches = RequestCaches::new();
        SavePipeline::new(fx.env(), &mut caches.schemas).save(POST, &form).unwrap();

        let mut caches = RequestCaches::new();
        let resolved = Resolver::new(fx.env(), &mut caches)
            .resolve_one("gallery", POST)
            .unwrap()
            .unwrap();
        let resolved = resolved.as_iterations().unwrap();

        prop_assert_eq!(resolved.len(), iterations.len());
        for (i, (iteration, tags)) in resolved.iter().zip(&iterations).enumerate() {
            prop_assert_eq!(&iteration["caption"], &ResolvedValue::Single(format!("row {i}")));
            prop_assert_eq!(&iteration["tags"], &ResolvedValue::Multiple(tags.clone()));
        }
    }

    /// Memoization never changes the result.
    #[test]
    fn resolve_all_is_stable_within_a_request(iterations in iterations_strategy()) {
        let fx = Fixture::new(gallery());
        let flat: Vec<&str> = iterations.iter().flatten().map(String::as_str).collect();
        fx.seed(POST, "tags", &flat);
        let counts: Vec<usize> = iterations.iter().map(Vec::len).collect();
        fx.seed_counts(POST, &serde_json::json!({ "tags": counts }).to_string());

        let mut caches = RequestCaches::new();
        let mut resolver = Resolver::new(fx.env(), &mut caches);
        let first = resolver.resolve_all(POST).unwrap();
        let second = resolver.resolve_all(POST).unwrap();
        let one = resolver.resolve_one("gallery", POST).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(one.as_ref(), first.get("gallery"));
    }
}
