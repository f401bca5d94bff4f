//! Stored metadata shapes.
//!
//! The host keeps every key as a list of strings, so multi-valued fields from
//! all iterations of a repeatable group end up flattened into one list. The
//! [`RepeatCounts`] side record is what splits that list back into iterations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored values of one entity, keyed by metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMetadata(BTreeMap<String, Vec<String>>);

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values stored under `key`, empty when the key is absent.
    pub fn values(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), values);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for RawMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut meta = Self::new();
        for (key, value) in iter {
            meta.push(key, value);
        }
        meta
    }
}

/// Per-field iteration sizes: entry `i` is how many consecutive raw values
/// belong to iteration `i`. A zero means the iteration holds no values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepeatCounts(BTreeMap<String, Vec<usize>>);

impl RepeatCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&[usize]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn set(&mut self, field: impl Into<String>, counts: Vec<usize>) {
        self.0.insert(field.into(), counts);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of iterations recorded for `field`.
    pub fn iterations(&self, field: &str) -> Option<usize> {
        self.0.get(field).map(Vec::len)
    }

    /// The raw values of iteration `index` of `field`.
    ///
    /// Returns `None` when `field` has no entry, when `index` is past the
    /// recorded iterations, or when the iteration's count is zero. Counts that
    /// overrun `values` are clamped.
    pub fn slot<'v>(&self, field: &str, index: usize, values: &'v [String]) -> Option<&'v [String]> {
        let counts = self.get(field)?;
        let count = *counts.get(index)?;
        if count == 0 {
            return None;
        }
        let start = counts[..index].iter().fold(0usize, |sum, &c| sum.saturating_add(c));
        Some(clamped(values, start, count))
    }
}

/// Splits `values` into consecutive slices sized by `counts`.
///
/// Always yields one slice per count. A mismatched record never fails: slices
/// past the end of `values` come back short or empty, and values beyond the
/// sum of the counts are not surfaced.
pub fn partition_by_counts<'v>(values: &'v [String], counts: &[usize]) -> Vec<&'v [String]> {
    let mut offset = 0;
    counts
        .iter()
        .map(|&count| {
            let slice = clamped(values, offset, count);
            offset = offset.saturating_add(count);
            slice
        })
        .collect()
}

fn clamped(values: &[String], start: usize, len: usize) -> &[String] {
    let start = start.min(values.len());
    let end = start.saturating_add(len).min(values.len());
    &values[start..end]
}
