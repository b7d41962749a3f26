//! Schema validation logic.

use std::collections::HashSet;

use crate::schema::{ControlSpec, GraphSchema, ModelSchema, StateVariableSpec};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty collection: {context}")]
    Empty { context: String },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_control_spec(spec: &ControlSpec) -> Result<(), ValidationError> {
    if spec.name.trim().is_empty() {
        return Err(invalid("name", &spec.name, "must not be blank"));
    }
    for (field, v) in [
        ("min", spec.min),
        ("max", spec.max),
        ("step", spec.step),
        ("default", spec.default),
    ] {
        if !v.is_finite() {
            return Err(invalid(format!("{}.{field}", spec.name), v, "must be finite"));
        }
    }
    if spec.min > spec.max {
        return Err(invalid(
            format!("{}.min", spec.name),
            spec.min,
            "must not exceed max",
        ));
    }
    if spec.default < spec.min || spec.default > spec.max {
        return Err(invalid(
            format!("{}.default", spec.name),
            spec.default,
            "must lie within [min, max]",
        ));
    }
    if spec.step <= 0.0 {
        return Err(invalid(
            format!("{}.step", spec.name),
            spec.step,
            "must be positive",
        ));
    }
    Ok(())
}

pub fn validate_state_variable(sv: &StateVariableSpec) -> Result<(), ValidationError> {
    validate_control_spec(&sv.control)?;
    let (min, max) = sv.bounds();
    if !sv.lo.is_finite() || !sv.hi.is_finite() {
        return Err(invalid(
            format!("{}.range", sv.name()),
            format!("[{}, {}]", sv.lo, sv.hi),
            "must be finite",
        ));
    }
    if sv.lo > sv.hi || sv.lo < min || sv.hi > max {
        return Err(invalid(
            format!("{}.range", sv.name()),
            format!("[{}, {}]", sv.lo, sv.hi),
            "must satisfy min <= lo <= hi <= max",
        ));
    }
    Ok(())
}

/// Validate a list of control specs: each spec individually plus unique names.
pub fn validate_controls(specs: &[ControlSpec], context: &str) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    for spec in specs {
        validate_control_spec(spec)?;
        if !names.insert(spec.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: spec.name.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_graph_schema(graph: &GraphSchema) -> Result<(), ValidationError> {
    if graph.state_variables.len() < 2 {
        return Err(ValidationError::Empty {
            context: "graph_params.state_variables (need at least two)".to_string(),
        });
    }

    let mut names = HashSet::new();
    for sv in &graph.state_variables {
        validate_state_variable(sv)?;
        if !names.insert(sv.name()) {
            return Err(ValidationError::DuplicateName {
                name: sv.name().to_string(),
                context: "graph_params.state_variables".to_string(),
            });
        }
    }

    for name in &graph.default_sv {
        if !names.contains(name.as_str()) {
            return Err(ValidationError::MissingReference {
                name: name.clone(),
                context: "graph_params.default_sv".to_string(),
            });
        }
    }
    if graph.default_sv[0] == graph.default_sv[1] {
        return Err(invalid(
            "graph_params.default_sv",
            &graph.default_sv[0],
            "x and y axes must show different variables",
        ));
    }

    if !graph.modes.is_empty() && !graph.modes.contains(&graph.default_mode) {
        return Err(ValidationError::MissingReference {
            name: graph.default_mode.clone(),
            context: "graph_params.modes".to_string(),
        });
    }
    Ok(())
}

pub fn validate_model_schema(schema: &ModelSchema) -> Result<(), ValidationError> {
    validate_controls(&schema.params, "params")?;
    validate_graph_schema(&schema.graph_params)
}
