use crate::EntityId;

/// The narrow slice of the host content system that resolution depends on.
///
/// Storage primitives live behind `fieldkit_store::MetaStore`; everything
/// else the engine needs from the host (which schema applies, whether a
/// related item is published, how rich text is rendered, which draft a
/// preview request maps to) comes through this trait.
///
/// Only `content_type_of` and `status_of` are required. Hosts without a
/// preview mechanism or a content filter can rely on the identity defaults.
pub trait ContentHost {
    /// Maps a possibly-preview id to the entity whose metadata should be read.
    fn canonical_id(&self, id: EntityId) -> EntityId {
        id
    }

    /// The content type whose schema applies to `id`, or `None` if the host
    /// does not know the entity.
    fn content_type_of(&self, id: EntityId) -> Option<String>;

    /// The publication status of `id` (e.g. `"publish"`, `"draft"`).
    fn status_of(&self, id: EntityId) -> Option<String>;

    /// The rich-content transform applied to textarea and wysiwyg values.
    fn transform_content(&self, text: &str) -> String {
        text.to_string()
    }
}
