//! Tool-specific error types.

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::canvas::CanvasError;

/// One argument that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentIssue {
    /// JSON pointer to the offending value, or `(root)`.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ArgumentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Arguments did not match the tool's input schema.
    #[error("Invalid arguments: {}", join_issues(.0))]
    InvalidArguments(Vec<ArgumentIssue>),

    /// The Canvas request failed.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// The operation is deliberately not available.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_issues(issues: &[ArgumentIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// A single-issue validation error.
    pub fn invalid_argument(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments(vec![ArgumentIssue {
            path: path.into(),
            message: message.into(),
        }])
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Structured data attached to the JSON-RPC error for a Canvas failure.
fn canvas_error_data(err: &CanvasError) -> Option<Value> {
    match err {
        CanvasError::Api { status, body, .. } => {
            let body = serde_json::from_str::<Value>(body).unwrap_or_else(|_| json!(body));
            Some(json!({ "status": status, "body": body }))
        }
        CanvasError::Transport { .. } => None,
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let message = err.to_string();
        match err {
            ToolError::NotFound(_) => McpError::new(ErrorCode::METHOD_NOT_FOUND, message, None),
            ToolError::InvalidArguments(issues) => {
                McpError::invalid_params(message, Some(json!({ "issues": issues })))
            }
            ToolError::Canvas(canvas) => McpError::internal_error(message, canvas_error_data(&canvas)),
            ToolError::Unsupported(_) | ToolError::Internal(_) => {
                McpError::internal_error(message, None)
            }
        }
    }
}
