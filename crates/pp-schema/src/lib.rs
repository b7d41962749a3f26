//! pp-schema: wire format of the compute service and its validation.

pub mod schema;
pub mod validate;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use schema::*;
pub use validate::{
    ValidationError, validate_control_spec, validate_controls, validate_graph_schema,
    validate_model_schema, validate_state_variable,
};

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode and validate a `model_changed` reply body.
pub fn parse_model_schema(body: &str) -> SchemaResult<ModelSchema> {
    let schema: ModelSchema = serde_json::from_str(body)?;
    validate_model_schema(&schema)?;
    Ok(schema)
}

/// Load a model schema from disk; `.json` files are read as JSON, anything else as YAML.
pub fn load_model_schema(path: &Path) -> SchemaResult<ModelSchema> {
    let content = std::fs::read_to_string(path)?;
    let schema: ModelSchema = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    validate_model_schema(&schema)?;
    Ok(schema)
}

pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> SchemaResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
