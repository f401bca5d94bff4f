//! Engine configuration, read from `fieldkit.toml`: key naming, the
//! publication literal, form naming and the accepted entity kinds.

use crate::ConfigError;
use fieldkit_store::EntityKinds;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "fieldkit.toml";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix of the engine's own bookkeeping keys.
    pub meta_prefix: String,
    /// Prefix applied to field names when addressing the metadata store.
    pub field_key_prefix: String,
    /// Status a relation target must have to be surfaced.
    pub published_status: String,
    /// Root name of submitted form inputs.
    pub form_field: String,
    pub content_types: Vec<String>,
    pub account_roles: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            meta_prefix: "smart-cf-".to_string(),
            field_key_prefix: String::new(),
            published_status: "publish".to_string(),
            form_field: "smart-custom-fields".to_string(),
            content_types: vec!["post".to_string(), "page".to_string()],
            account_roles: vec![
                "administrator".to_string(),
                "editor".to_string(),
                "author".to_string(),
                "contributor".to_string(),
                "subscriber".to_string(),
            ],
        }
    }
}

/// Raw TOML structure matching the `fieldkit.toml` format.
#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    fields: EngineConfig,
}

impl EngineConfig {
    /// Loads `fieldkit.toml` from the working directory if it exists.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE_NAME)
    }

    /// Loads config from an explicit path.
    /// Falls back to defaults with a warning on read or parse errors.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => {
                info!("Loaded field engine config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load config {:?}: {}. Falling back to defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Reads and parses a config file, reporting every failure.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.fields)
    }

    /// The entity kinds the metadata adapter accepts.
    pub fn entity_kinds(&self) -> EntityKinds {
        EntityKinds {
            content_types: self.content_types.clone(),
            account_roles: self.account_roles.clone(),
        }
    }

    /// Store key of a field.
    pub fn field_key(&self, name: &str) -> String {
        format!("{}{}", self.field_key_prefix, name)
    }

    /// Store key of the repeat-count side record.
    pub fn repeat_counts_key(&self) -> String {
        format!("{}repeat-multiple-data", self.meta_prefix)
    }

    pub fn is_published(&self, status: &str) -> bool {
        status == self.published_status
    }
}
