//! Tunable engine settings with TOML file support.
//!
//! Pick tolerances and the force pruning threshold are consolidated here.
//! Options serialize to/from TOML so a session can be started with
//! per-project settings.

mod annotations;
mod picking;

use std::path::Path;

pub use annotations::AnnotationOptions;
pub use picking::PickingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PrepError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[picking]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Node picking tolerances.
    pub picking: PickingOptions,
    /// Fixed-node and force bookkeeping.
    pub annotations: AnnotationOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults; values
    /// outside their valid range are rejected.
    pub fn load(path: &Path) -> Result<Self, PrepError> {
        let content = std::fs::read_to_string(path).map_err(PrepError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| PrepError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check every section's values.
    pub fn validate(&self) -> Result<(), PrepError> {
        self.picking.validate()?;
        self.annotations.validate()
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), PrepError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PrepError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PrepError::Io)?;
        }
        std::fs::write(path, content).map_err(PrepError::Io)
    }
}
