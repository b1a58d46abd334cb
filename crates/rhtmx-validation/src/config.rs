// File: src/config.rs
// Purpose: Engine configuration parsing from rhtmx-validation.toml

use crate::error::{Result, ValidationError};
use crate::messages::{CatalogEntry, MessageCatalog};
use crate::value::OptionMap;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Engine-wide validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Event type of an explicit, manual validation request
    #[serde(default = "default_manual_trigger")]
    pub manual_trigger: String,

    /// Default value length below which the first pass is held back
    #[serde(default = "default_validation_minlength")]
    pub validation_minlength: usize,

    /// Report empty values as invalid for `type` constraints
    #[serde(default)]
    pub strict_empty_values: bool,

    /// Prefix of generated error container identifiers
    #[serde(default = "default_container_id_prefix")]
    pub container_id_prefix: String,

    /// Option defaults for fields without an explicit override
    #[serde(default)]
    pub defaults: OptionMap,

    /// Message template overrides, merged over the built-in catalog
    #[serde(default)]
    pub messages: BTreeMap<String, CatalogEntry>,
}

// Default values
fn default_manual_trigger() -> String {
    "validate".to_string()
}

fn default_validation_minlength() -> usize {
    3
}

fn default_container_id_prefix() -> String {
    "rhtmx-errors-".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            manual_trigger: default_manual_trigger(),
            validation_minlength: default_validation_minlength(),
            strict_empty_values: false,
            container_id_prefix: default_container_id_prefix(),
            defaults: OptionMap::new(),
            messages: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./rhtmx-validation.toml)
    pub fn load_default() -> anyhow::Result<Self> {
        Self::load("rhtmx-validation.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(content).map_err(|e| ValidationError::Config(e.to_string()))
    }

    /// Built-in catalog with this configuration's overrides applied
    pub fn catalog(&self) -> MessageCatalog {
        let mut catalog = MessageCatalog::english();
        catalog.merge(&self.messages);
        catalog
    }
}
