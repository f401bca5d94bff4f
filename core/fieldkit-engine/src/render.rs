//! The render path: expand a schema into per-iteration rows of inputs.
//!
//! A renderer walks the returned [`RenderRow`]s in order. Repeatable groups
//! lead with a template row (index `None`) that client-side code clones when
//! the user adds an iteration; the template is never read back on save.

use crate::{Env, RequestCaches, input_name};
use fieldkit_model::{EntityId, FieldDefinition, FieldGroup, FieldType, RawMetadata, RepeatCounts};
use fieldkit_store::StoreResult;
use serde::Serialize;
use tracing::debug;

/// The value pre-filled into one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Single(String),
    Multiple(Vec<String>),
}

impl BoundValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Multiple(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(values) => Some(values),
        }
    }
}

/// One field's input within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderCell {
    pub name: String,
    pub field_type: FieldType,
    pub label: String,
    pub value: BoundValue,
    pub notes: String,
    /// Form input name the save pipeline parses back.
    pub input_name: String,
}

/// One iteration of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRow {
    /// Position of the group in the schema.
    pub group_index: usize,
    pub group_name: Option<String>,
    pub is_repeatable: bool,
    /// Iteration index, or `None` for the template row.
    pub index: Option<usize>,
    pub cells: Vec<RenderCell>,
}

impl RenderRow {
    pub fn is_template(&self) -> bool {
        self.index.is_none()
    }

    pub fn cell(&self, name: &str) -> Option<&RenderCell> {
        self.cells.iter().find(|c| c.name == name)
    }
}

/// Expands field groups and an entity's stored metadata into [`RenderRow`]s.
pub struct TableBuilder<'a> {
    env: Env<'a>,
    caches: &'a mut RequestCaches,
}

impl<'a> TableBuilder<'a> {
    pub fn new(env: Env<'a>, caches: &'a mut RequestCaches) -> Self {
        Self { env, caches }
    }

    /// Expands the schema of the entity's own content type. An entity the
    /// host does not know yields no rows.
    pub fn expand_entity(&mut self, id: EntityId) -> StoreResult<Vec<RenderRow>> {
        let id = self.env.host.canonical_id(id);
        let Some(content_type) = self.env.host.content_type_of(id) else {
            debug!("Entity {} has no content type; nothing to render", id);
            return Ok(Vec::new());
        };
        let schema = self
            .caches
            .schemas
            .get_or_load(self.env.schemas, &content_type)?;
        self.expand_canonical(id, &schema.groups)
    }

    /// Expands `groups` against the stored metadata of `id`.
    pub fn expand(&mut self, id: EntityId, groups: &[FieldGroup]) -> StoreResult<Vec<RenderRow>> {
        let id = self.env.host.canonical_id(id);
        self.expand_canonical(id, groups)
    }

    fn expand_canonical(&mut self, id: EntityId, groups: &[FieldGroup]) -> StoreResult<Vec<RenderRow>> {
        let env = self.env;
        let meta = self.caches.snapshots.get_or_load(env.store, id)?;
        let counts = self
            .caches
            .repeat_counts
            .get_or_load(env.store, &env.config.repeat_counts_key(), id)?;

        let mut rows = Vec::new();
        for (group_index, group) in groups.iter().enumerate() {
            let binder = Binder {
                env,
                group,
                meta: &meta,
                counts: &counts,
            };
            if group.is_repeatable {
                let loop_count = binder.loop_count();
                debug!(
                    "Group {} of entity {} expands to {} iterations",
                    group_index, id, loop_count
                );
                rows.push(binder.row(group_index, None));
                rows.extend((0..loop_count).map(|i| binder.row(group_index, Some(i))));
            } else {
                rows.push(binder.row(group_index, Some(0)));
            }
        }
        Ok(rows)
    }
}

/// Binds one group's fields to values for a given iteration.
struct Binder<'b> {
    env: Env<'b>,
    group: &'b FieldGroup,
    meta: &'b RawMetadata,
    counts: &'b RepeatCounts,
}

impl Binder<'_> {
    fn raw(&self, field: &FieldDefinition) -> &[String] {
        self.meta.values(&self.env.config.field_key(&field.name))
    }

    fn has_stored(&self, field: &FieldDefinition) -> bool {
        self.meta.contains(&self.env.config.field_key(&field.name))
    }

    /// Number of iterations to render: the largest recorded or observed
    /// iteration count across member fields, at least one.
    fn loop_count(&self) -> usize {
        self.group.fields.iter().fold(1, |count, field| {
            match self.counts.iterations(&field.name) {
                Some(iterations) => count.max(iterations),
                None => {
                    let stored = self.raw(field).len();
                    if stored > 1 { count.max(stored) } else { count }
                }
            }
        })
    }

    fn row(&self, group_index: usize, index: Option<usize>) -> RenderRow {
        let cells = self
            .group
            .fields
            .iter()
            .map(|field| {
                let multiple = field.allows_multiple_data();
                RenderCell {
                    name: field.name.clone(),
                    field_type: field.field_type.clone(),
                    label: field.display_label().to_string(),
                    value: self.bind(field, index),
                    notes: field.notes.clone(),
                    input_name: input_name(&self.env.config.form_field, &field.name, index, multiple),
                }
            })
            .collect();
        RenderRow {
            group_index,
            group_name: self.group.group_name.clone(),
            is_repeatable: self.group.is_repeatable,
            index,
            cells,
        }
    }

    fn bind(&self, field: &FieldDefinition, index: Option<usize>) -> BoundValue {
        let Some(index) = index else {
            return default_value(field);
        };
        let raw = self.raw(field);
        let multiple = field.allows_multiple_data();

        if self.group.is_repeatable {
            if !multiple {
                return BoundValue::Single(raw.get(index).cloned().unwrap_or_default());
            }
            if self.counts.get(&field.name).is_some() {
                let slot = self.counts.slot(&field.name, index, raw).unwrap_or_default();
                return BoundValue::Multiple(slot.to_vec());
            }
            return BoundValue::Multiple(raw.get(index).cloned().into_iter().collect());
        }

        if !self.has_stored(field) {
            return default_value(field);
        }
        if multiple {
            BoundValue::Multiple(raw.to_vec())
        } else {
            BoundValue::Single(raw.first().cloned().unwrap_or_default())
        }
    }
}

fn default_value(field: &FieldDefinition) -> BoundValue {
    if field.allows_multiple_data() {
        BoundValue::Multiple(field.default_choices())
    } else {
        BoundValue::Single(field.default.clone())
    }
}
