use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One iteration of a repeatable group: member field name to its value.
pub type Iteration = BTreeMap<String, ResolvedValue>;

/// The clean value handed to templates.
///
/// Serializes untagged, so a resolved entity renders as plain JSON:
/// strings, string arrays, and arrays of objects for repeatable groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    Single(String),
    Multiple(Vec<String>),
    Group(Vec<Iteration>),
}

impl ResolvedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Multiple(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_iterations(&self) -> Option<&[Iteration]> {
        match self {
            Self::Group(iterations) => Some(iterations),
            _ => None,
        }
    }

    /// True for an empty string, list or group.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::Multiple(values) => values.is_empty(),
            Self::Group(iterations) => iterations.is_empty(),
        }
    }
}

impl From<&str> for ResolvedValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for ResolvedValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for ResolvedValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}
