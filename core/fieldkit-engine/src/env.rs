use crate::EngineConfig;
use fieldkit_model::ContentHost;
use fieldkit_store::{MetaStore, SchemaSource};

/// The collaborators one request runs against.
///
/// Everything here is borrowed and read-only; per-request state lives in
/// [`crate::RequestCaches`].
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub store: &'a dyn MetaStore,
    pub schemas: &'a dyn SchemaSource,
    pub host: &'a dyn ContentHost,
    pub config: &'a EngineConfig,
}

impl<'a> Env<'a> {
    pub fn new(
        store: &'a dyn MetaStore,
        schemas: &'a dyn SchemaSource,
        host: &'a dyn ContentHost,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            store,
            schemas,
            host,
            config,
        }
    }

    /// Whether a stored relation value points at a published entity.
    /// Values that are not entity ids never are.
    pub(crate) fn is_published(&self, raw: &str) -> bool {
        fieldkit_model::EntityId::parse(raw)
            .ok()
            .and_then(|target| self.host.status_of(target))
            .is_some_and(|status| self.config.is_published(&status))
    }
}
