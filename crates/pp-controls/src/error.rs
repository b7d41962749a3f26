//! Error types for control operations.

use pp_core::CoreError;
use pp_schema::ValidationError;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Control name not declared in the group.
    #[error("Unknown control: {name}")]
    UnknownControl { name: String },

    /// State variable not declared in the graph schema.
    #[error("Unknown state variable: {name}")]
    UnknownVariable { name: String },

    /// Display mode not offered by the graph schema.
    #[error("Unknown display mode: {mode}")]
    UnknownMode { mode: String },

    /// The control is currently non-interactive.
    #[error("Control is disabled: {name}")]
    Disabled { name: String },

    /// The declared specs are inconsistent.
    #[error("Invalid control spec: {0}")]
    InvalidSpec(#[from] ValidationError),
}
