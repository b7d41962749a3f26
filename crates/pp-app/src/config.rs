//! Session configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Which fields of the form tree carry which meaning.
///
/// Field names are dotted paths into the nested snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeSchema {
    /// Field holding the selected model identifier.
    pub model_field: String,
    /// Fields naming the configuration; edits here never trigger recomputation.
    pub identity_fields: Vec<String>,
    /// Fields submitted on an integrator edit. Empty submits the whole snapshot.
    pub integrator_fields: Vec<String>,
}

impl Default for TreeSchema {
    fn default() -> Self {
        Self {
            model_field: "model_type".to_string(),
            identity_fields: vec!["dynamic_name".to_string()],
            integrator_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiet period for graph, parameter and integrator recomputes.
    pub debounce_ms: u64,
    /// Leading-edge window for trajectory creation.
    pub throttle_ms: u64,
    pub tree: TreeSchema,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 25,
            throttle_ms: 500,
            tree: TreeSchema::default(),
        }
    }
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Load from a YAML file; missing fields take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        pp_schema::load_yaml(path).map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }
}
