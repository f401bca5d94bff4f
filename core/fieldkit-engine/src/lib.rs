//! Custom-field resolution engine for fieldkit.
//!
//! Turns a content type's field-group schema plus an entity's loosely shaped
//! stored metadata into the nested values templates consume, and runs the
//! inverse: expanding the schema into per-iteration form rows and writing a
//! submitted form back to the store.
//!
//! # Architecture
//!
//! - [`Env`] bundles the collaborators: metadata store, schema source, host, config
//! - [`RequestCaches`] holds the request-scoped memo tables; build one per
//!   request and drop it when the request ends
//! - [`Resolver`] is the read path (`resolve_all`, `resolve_one`)
//! - [`TableBuilder`] is the render path (`expand`)
//! - [`SavePipeline`] parses a [`FormSubmission`] and overwrites stored values,
//!   including the repeat-count side record
//!
//! Store failures are returned unchanged as [`fieldkit_store::StoreError`].

mod cache;
mod config;
mod env;
mod error;
mod render;
mod resolve;
mod save;

pub use cache::{RepeatCountsCache, RequestCaches, ResultCache, SchemaCache, SnapshotCache};
pub use config::{CONFIG_FILE_NAME, EngineConfig};
pub use env::Env;
pub use error::ConfigError;
pub use render::{BoundValue, RenderCell, RenderRow, TableBuilder};
pub use resolve::Resolver;
pub use save::{FormSubmission, SavePipeline, SaveReport, SubmittedField, TEMPLATE_INDEX, input_name};
