//! Error types for the session layer.

/// Everything that can go wrong while handling an event or merging a reply.
///
/// None of these cross the session's public entry points; each one is
/// logged and, when the user needs to know, shown through the view.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No model loaded")]
    NoModel,

    #[error("Trajectory contains infinities. Try to decrease the integration step.")]
    DivergentComputation,

    #[error("A name is required")]
    EmptyIdentity,

    #[error("Remote {operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    #[error("Malformed {operation} reply: {message}")]
    MalformedReply {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to decode reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for pp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pp_controls::ControlError> for AppError {
    fn from(err: pp_controls::ControlError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<pp_schema::SchemaError> for AppError {
    fn from(err: pp_schema::SchemaError) -> Self {
        AppError::Schema(err.to_string())
    }
}
