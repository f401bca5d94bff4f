use crate::FieldDefinition;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// An ordered collection of fields, optionally repeatable.
///
/// The JSON shape matches the documents written by the admin screen:
/// `{"group-name": "slides", "repeat": true, "fields": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldGroup {
    /// Collective name of a repeatable unit. Empty strings load as `None`.
    #[serde(
        default,
        rename = "group-name",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_name: Option<String>,
    #[serde(default, rename = "repeat")]
    pub is_repeatable: bool,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()))
}

impl FieldGroup {
    /// A plain, non-repeating group.
    pub fn single(fields: Vec<FieldDefinition>) -> Self {
        Self {
            group_name: None,
            is_repeatable: false,
            fields,
        }
    }

    /// A named repeatable group.
    pub fn repeatable(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            group_name: Some(name.into()),
            is_repeatable: true,
            fields,
        }
    }

    /// The name this group resolves under, if it resolves as a unit.
    ///
    /// Only repeatable groups with a non-empty name nest their fields;
    /// everything else exposes its fields individually.
    pub fn repeat_name(&self) -> Option<&str> {
        if self.is_repeatable {
            self.group_name.as_deref()
        } else {
            None
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One top-level output of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaEntry<'a> {
    /// A named repeatable group, resolved as a list of iterations.
    Group(&'a FieldGroup),
    /// A field resolved on its own. `in_repeat` marks members of repeatable
    /// groups, which always resolve as lists.
    Field {
        field: &'a FieldDefinition,
        in_repeat: bool,
    },
}

impl<'a> SchemaEntry<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Group(group) => group.group_name.as_deref().unwrap_or_default(),
            Self::Field { field, .. } => &field.name,
        }
    }
}

/// The ordered field groups that apply to one content type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub content_type: String,
    pub groups: Vec<FieldGroup>,
}

impl Schema {
    pub fn new(content_type: impl Into<String>, groups: Vec<FieldGroup>) -> Self {
        Self {
            content_type: content_type.into(),
            groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.fields.is_empty())
    }

    /// Top-level outputs in schema order.
    pub fn entries(&self) -> Vec<SchemaEntry<'_>> {
        let mut entries = Vec::new();
        for group in &self.groups {
            if group.repeat_name().is_some() {
                entries.push(SchemaEntry::Group(group));
            } else {
                entries.extend(group.fields.iter().map(|field| SchemaEntry::Field {
                    field,
                    in_repeat: group.is_repeatable,
                }));
            }
        }
        entries
    }

    /// Finds what `name` resolves to.
    ///
    /// Top-level outputs win over members of named repeatable groups, and
    /// among duplicates the last definition wins, matching the key collisions
    /// of a full resolution map.
    pub fn lookup(&self, name: &str) -> Option<SchemaEntry<'_>> {
        if let Some(entry) = self.entries().into_iter().rev().find(|e| e.name() == name) {
            return Some(entry);
        }
        self.groups
            .iter()
            .rev()
            .filter(|g| g.repeat_name().is_some())
            .find_map(|g| g.fields.iter().rev().find(|f| f.name == name))
            .map(|field| SchemaEntry::Field {
                field,
                in_repeat: true,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every field with the group it belongs to, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldGroup, &FieldDefinition)> {
        self.groups
            .iter()
            .flat_map(|group| group.fields.iter().map(move |field| (group, field)))
    }

    /// Field and group names defined more than once, sorted.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for group in &self.groups {
            if let Some(name) = group.repeat_name() {
                *seen.entry(name).or_default() += 1;
            }
            for field in &group.fields {
                *seen.entry(field.name.as_str()).or_default() += 1;
            }
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}
