//! The write path: a submitted form back to stored metadata.
//!
//! Inputs are named `{form_field}[{field}][{index}]`, with a trailing `[]`
//! on multi-valued fields. Index tokens are opaque: rows are identified by
//! token and ordered by first appearance, so rows the user reordered or
//! added client-side keep their submitted order.

use crate::{Env, SchemaCache};
use fieldkit_model::{EntityId, FieldDefinition, FieldGroup, RepeatCounts};
use fieldkit_store::StoreResult;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Index token of the template row; never saved.
pub const TEMPLATE_INDEX: &str = "_template";

/// The form input name of `field` at iteration `index` (`None` for the
/// template row).
pub fn input_name(form_field: &str, field: &str, index: Option<usize>, multiple: bool) -> String {
    let index = index.map_or_else(|| TEMPLATE_INDEX.to_string(), |i| i.to_string());
    let suffix = if multiple { "[]" } else { "" };
    format!("{form_field}[{field}][{index}]{suffix}")
}

/// Splits an input name into field name and index token.
fn parse_input_name<'n>(form_field: &str, name: &'n str) -> Option<(&'n str, &'n str)> {
    let rest = name.strip_prefix(form_field)?.strip_prefix('[')?;
    let (field, rest) = rest.split_once(']')?;
    let rest = rest.strip_prefix('[')?;
    let (index, rest) = rest.split_once(']')?;
    if field.is_empty() || index.is_empty() || !(rest.is_empty() || rest == "[]") {
        return None;
    }
    Some((field, index))
}

/// Everything submitted for one field, grouped by index token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmittedField {
    pub name: String,
    iterations: Vec<(String, Vec<String>)>,
}

impl SubmittedField {
    fn push(&mut self, index: &str, value: String) {
        match self.iterations.iter_mut().find(|(token, _)| token == index) {
            Some((_, values)) => values.push(value),
            None => self.iterations.push((index.to_string(), vec![value])),
        }
    }

    /// Index tokens in order of first appearance.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.iterations.iter().map(|(token, _)| token.as_str())
    }

    pub fn values_at(&self, index: &str) -> Option<&[String]> {
        self.iterations
            .iter()
            .find(|(token, _)| token == index)
            .map(|(_, values)| values.as_slice())
    }
}

/// A parsed form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSubmission {
    fields: Vec<SubmittedField>,
}

impl FormSubmission {
    /// Parses ordered `(input name, value)` pairs. Names outside
    /// `form_field` and template-row inputs are skipped.
    pub fn parse<N, V>(form_field: &str, pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (name, value) in pairs {
            let name = name.as_ref();
            let Some((field, index)) = parse_input_name(form_field, name) else {
                debug!("Ignoring form input '{}'", name);
                continue;
            };
            if index == TEMPLATE_INDEX {
                continue;
            }
            form.field_mut(field).push(index, value.into());
        }
        form
    }

    fn field_mut(&mut self, name: &str) -> &mut SubmittedField {
        let position = match self.fields.iter().position(|f| f.name == name) {
            Some(position) => position,
            None => {
                self.fields.push(SubmittedField {
                    name: name.to_string(),
                    iterations: Vec::new(),
                });
                self.fields.len() - 1
            }
        };
        &mut self.fields[position]
    }

    pub fn field(&self, name: &str) -> Option<&SubmittedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &SubmittedField> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Summary of one save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SaveReport {
    /// Schema fields whose stored values were replaced.
    pub fields_written: usize,
    /// Individual values added to the store.
    pub values_written: usize,
    /// The repeat-count record as written.
    pub repeat_counts: RepeatCounts,
}

/// Writes submitted forms back to the metadata store.
///
/// Every field the schema declares is overwritten, including fields the
/// form did not submit.
pub struct SavePipeline<'a> {
    env: Env<'a>,
    schemas: &'a mut SchemaCache,
}

impl<'a> SavePipeline<'a> {
    pub fn new(env: Env<'a>, schemas: &'a mut SchemaCache) -> Self {
        Self { env, schemas }
    }

    /// Saves `form` against the schema of the entity's content type.
    pub fn save(&mut self, id: EntityId, form: &FormSubmission) -> StoreResult<SaveReport> {
        let Some(content_type) = self.env.host.content_type_of(id) else {
            warn!("Entity {} has no content type; nothing saved", id);
            return Ok(SaveReport::default());
        };
        let schema = self.schemas.get_or_load(self.env.schemas, &content_type)?;
        self.save_groups(id, &schema.groups, form)
    }

    /// Saves `form` against an explicit list of groups.
    pub fn save_groups(&mut self, id: EntityId, groups: &[FieldGroup], form: &FormSubmission) -> StoreResult<SaveReport> {
        let mut report = SaveReport::default();
        for group in groups {
            if group.is_repeatable {
                self.save_repeatable(id, group, form, &mut report)?;
            } else {
                for field in &group.fields {
                    let values = form
                        .field(&field.name)
                        .and_then(|f| f.indices().next().and_then(|index| f.values_at(index)))
                        .unwrap_or_default();
                    self.clear(id, field)?;
                    report.fields_written += 1;
                    if field.allows_multiple_data() {
                        self.write_many(id, field, values, &mut report)?;
                    } else {
                        self.write_one(id, field, values, &mut report)?;
                    }
                }
            }
        }
        self.write_repeat_counts(id, &report.repeat_counts)?;
        info!(
            "Saved {} fields ({} values) for entity {}",
            report.fields_written, report.values_written, id
        );
        Ok(report)
    }

    fn save_repeatable(
        &self,
        id: EntityId,
        group: &FieldGroup,
        form: &FormSubmission,
        report: &mut SaveReport,
    ) -> StoreResult<()> {
        let mut indices: Vec<&str> = Vec::new();
        for field in &group.fields {
            if let Some(submitted) = form.field(&field.name) {
                for index in submitted.indices() {
                    if !indices.contains(&index) {
                        indices.push(index);
                    }
                }
            }
        }

        for field in &group.fields {
            let submitted = form.field(&field.name);
            self.clear(id, field)?;
            report.fields_written += 1;
            let multiple = field.allows_multiple_data();
            let mut counts = Vec::with_capacity(indices.len());
            for index in &indices {
                let values = submitted.and_then(|f| f.values_at(index)).unwrap_or_default();
                if multiple {
                    counts.push(self.write_many(id, field, values, report)?);
                } else {
                    self.write_one(id, field, values, report)?;
                }
            }
            if multiple && !counts.is_empty() {
                report.repeat_counts.set(field.name.clone(), counts);
            }
        }
        Ok(())
    }

    fn clear(&self, id: EntityId, field: &FieldDefinition) -> StoreResult<()> {
        self.env
            .store
            .delete(id, &self.env.config.field_key(&field.name), None)?;
        Ok(())
    }

    /// Stores the non-empty values; returns how many were stored.
    fn write_many(&self, id: EntityId, field: &FieldDefinition, values: &[String], report: &mut SaveReport) -> StoreResult<usize> {
        let key = self.env.config.field_key(&field.name);
        let mut written = 0;
        for value in values.iter().filter(|v| !v.is_empty()) {
            self.env.store.add(id, &key, value, false)?;
            written += 1;
        }
        report.values_written += written;
        Ok(written)
    }

    /// Stores the last submitted value, or an empty string.
    fn write_one(&self, id: EntityId, field: &FieldDefinition, values: &[String], report: &mut SaveReport) -> StoreResult<()> {
        let value = values.last().map(String::as_str).unwrap_or_default();
        self.env
            .store
            .add(id, &self.env.config.field_key(&field.name), value, false)?;
        report.values_written += 1;
        Ok(())
    }

    fn write_repeat_counts(&self, id: EntityId, counts: &RepeatCounts) -> StoreResult<()> {
        let key = self.env.config.repeat_counts_key();
        self.env.store.delete(id, &key, None)?;
        if counts.is_empty() {
            debug!("No repeat counts for entity {}", id);
            return Ok(());
        }
        let encoded = serde_json::to_string(counts)?;
        self.env.store.add(id, &key, &encoded, true)?;
        Ok(())
    }
}
