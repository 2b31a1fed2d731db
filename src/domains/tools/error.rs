//! Tool-specific error types.
//!
//! [`ToolError`] is the single translation point between domain failures and
//! whatever error envelope a transport speaks.

use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::domains::prompts::PromptError;

/// JSON-RPC code MCP uses for a missing resource.
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// JSON-RPC code for invalid parameters.
pub const INVALID_PARAMS: i32 = -32602;

/// JSON-RPC code for internal errors.
pub const INTERNAL_ERROR: i32 = -32603;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Malformed or incomplete arguments.
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// The referenced prompt or tool does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage, serialization, or any unclassified failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "validation" error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            Self::Validation(_) => INVALID_PARAMS,
            Self::NotFound(_) => RESOURCE_NOT_FOUND,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl From<PromptError> for ToolError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Validation(msg) => Self::Validation(msg),
            PromptError::NotFound(id) => Self::NotFound(format!("prompt '{}'", id)),
            PromptError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let message = err.to_string();
        match err {
            ToolError::Validation(_) => McpError::invalid_params(message, None),
            ToolError::NotFound(_) => McpError::resource_not_found(message, None),
            ToolError::Internal(_) => McpError::internal_error(message, None),
        }
    }
}
