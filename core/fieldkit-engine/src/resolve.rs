//! The read path: schema plus stored metadata to [`ResolvedValue`]s.

use crate::{Env, RequestCaches};
use fieldkit_model::{
    EntityId, FieldDefinition, FieldGroup, FieldType, Iteration, ResolvedValue, Schema, SchemaEntry,
    partition_by_counts,
};
use fieldkit_store::StoreResult;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// Resolves the fields of an entity's schema against its stored metadata.
///
/// Every result is memoized in [`RequestCaches::results`], so repeated calls
/// within one request read the store once per output.
pub struct Resolver<'a> {
    env: Env<'a>,
    caches: &'a mut RequestCaches,
}

impl<'a> Resolver<'a> {
    pub fn new(env: Env<'a>, caches: &'a mut RequestCaches) -> Self {
        Self { env, caches }
    }

    /// Resolves every top-level output of the entity's schema.
    ///
    /// Named repeatable groups appear under their group name; every other
    /// field under its own name. Stored keys the schema does not declare are
    /// never read.
    pub fn resolve_all(&mut self, id: EntityId) -> StoreResult<BTreeMap<String, ResolvedValue>> {
        let id = self.env.host.canonical_id(id);
        let Some(schema) = self.schema_for(id)? else {
            return Ok(BTreeMap::new());
        };

        // Later definitions replace earlier ones of the same name.
        let mut latest: BTreeMap<&str, SchemaEntry<'_>> = BTreeMap::new();
        for entry in schema.entries() {
            latest.insert(entry.name(), entry);
        }

        let mut resolved = BTreeMap::new();
        for (name, entry) in latest {
            resolved.insert(name.to_string(), self.resolve_entry(id, entry)?);
        }
        Ok(resolved)
    }

    /// Resolves one field or named repeatable group.
    ///
    /// Returns `None` exactly when the entity's schema declares nothing under
    /// `name`.
    pub fn resolve_one(&mut self, name: &str, id: EntityId) -> StoreResult<Option<ResolvedValue>> {
        let id = self.env.host.canonical_id(id);
        if let Some(value) = self.caches.results.get(id, name) {
            return Ok(Some(value.clone()));
        }
        let Some(schema) = self.schema_for(id)? else {
            return Ok(None);
        };
        match schema.lookup(name) {
            Some(entry) => self.resolve_entry(id, entry).map(Some),
            None => {
                debug!("'{}' is not declared for entity {}", name, id);
                Ok(None)
            }
        }
    }

    fn schema_for(&mut self, id: EntityId) -> StoreResult<Option<Rc<Schema>>> {
        let Some(content_type) = self.env.host.content_type_of(id) else {
            debug!("Entity {} has no content type; nothing to resolve", id);
            return Ok(None);
        };
        self.caches
            .schemas
            .get_or_load(self.env.schemas, &content_type)
            .map(Some)
    }

    fn resolve_entry(&mut self, id: EntityId, entry: SchemaEntry<'_>) -> StoreResult<ResolvedValue> {
        let name = entry.name();
        if let Some(value) = self.caches.results.get(id, name) {
            return Ok(value.clone());
        }
        let value = match entry {
            SchemaEntry::Group(group) => self.resolve_group(id, group)?,
            SchemaEntry::Field { field, in_repeat } => self.resolve_field(id, field, in_repeat)?,
        };
        self.caches.results.insert(id, name, value.clone());
        Ok(value)
    }

    fn resolve_group(&mut self, id: EntityId, group: &FieldGroup) -> StoreResult<ResolvedValue> {
        let env = self.env;
        let counts = self
            .caches
            .repeat_counts
            .get_or_load(env.store, &env.config.repeat_counts_key(), id)?;

        let mut iterations: Vec<Iteration> = Vec::new();
        for field in &group.fields {
            let raw = env.store.get(id, &env.config.field_key(&field.name))?;
            match counts.get(&field.name) {
                Some(field_counts) => {
                    for (index, slice) in partition_by_counts(&raw, field_counts).into_iter().enumerate() {
                        let values = self.post_process_list(field, slice);
                        iteration_at(&mut iterations, index)
                            .insert(field.name.clone(), ResolvedValue::Multiple(values));
                    }
                }
                None => {
                    for (index, value) in raw.iter().enumerate() {
                        // An unpublished relation drops the member from this
                        // iteration entirely rather than leaving a blank.
                        if field.field_type == FieldType::Relation && !env.is_published(value) {
                            continue;
                        }
                        let value = self.post_process_single(field, value);
                        iteration_at(&mut iterations, index)
                            .insert(field.name.clone(), ResolvedValue::Single(value));
                    }
                }
            }
        }
        Ok(ResolvedValue::Group(iterations))
    }

    fn resolve_field(&mut self, id: EntityId, field: &FieldDefinition, in_repeat: bool) -> StoreResult<ResolvedValue> {
        let key = self.env.config.field_key(&field.name);
        // Same shape the save pipeline writes.
        if in_repeat || field.allows_multiple_data() {
            let raw = self.env.store.get(id, &key)?;
            return Ok(ResolvedValue::Multiple(self.post_process_list(field, &raw)));
        }

        let value = self
            .env
            .store
            .get_single(id, &key)?
            .unwrap_or_else(|| field.default.clone());
        if field.field_type == FieldType::Relation && !self.env.is_published(&value) {
            return Ok(ResolvedValue::Single(String::new()));
        }
        Ok(ResolvedValue::Single(self.post_process_single(field, &value)))
    }

    fn post_process_list(&self, field: &FieldDefinition, values: &[String]) -> Vec<String> {
        if field.field_type.is_rich_text() {
            values.iter().map(|v| self.env.host.transform_content(v)).collect()
        } else if field.field_type == FieldType::Relation {
            values
                .iter()
                .filter(|v| self.env.is_published(v))
                .cloned()
                .collect()
        } else {
            values.to_vec()
        }
    }

    fn post_process_single(&self, field: &FieldDefinition, value: &str) -> String {
        if field.field_type.is_rich_text() {
            self.env.host.transform_content(value)
        } else {
            value.to_string()
        }
    }
}

/// The iteration at `index`, padding with empty iterations as needed.
fn iteration_at(iterations: &mut Vec<Iteration>, index: usize) -> &mut Iteration {
    if iterations.len() <= index {
        iterations.resize_with(index + 1, Iteration::new);
    }
    &mut iterations[index]
}
