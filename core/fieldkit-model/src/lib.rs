//! Field schema and metadata model for fieldkit.
//!
//! Defines the types every fieldkit subsystem shares:
//! - [`FieldDefinition`] / [`FieldType`]: a single administrator-defined value slot
//! - [`FieldGroup`] / [`Schema`]: ordered groups of fields for one content type
//! - [`RawMetadata`] / [`RepeatCounts`]: stored values and the repeat-count side record
//! - [`ResolvedValue`]: the clean, nested value handed to templates
//! - [`ContentHost`]: the narrow interface to the host content system
//!
//! Storage, resolution and rendering live in `fieldkit-store` and
//! `fieldkit-engine`; this crate holds no behavior beyond pure helpers.

mod field;
mod host;
mod ids;
mod metadata;
mod schema;
mod value;

pub use field::{FieldDefinition, FieldType, choices_eol_to_array};
pub use host::ContentHost;
pub use ids::{EntityId, MetaId};
pub use metadata::{RawMetadata, RepeatCounts, partition_by_counts};
pub use schema::{FieldGroup, Schema, SchemaEntry};
pub use value::{Iteration, ResolvedValue};
