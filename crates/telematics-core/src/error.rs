//! Common error types for telematics core operations

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur outside the total normalization path
#[derive(Debug, Error)]
pub enum CoreError {
    /// Telemetry text was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Telemetry document root is not an object
    #[error("Telemetry root must be an object, got {0}")]
    NotAnObject(&'static str),
}

/// Name of a JSON value's kind, used in error messages
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
