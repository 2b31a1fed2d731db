//! Error types and handling for the MCP server.
//!
//! A unified error type over the domain, storage and transport failures, for
//! callers that embed the server and want a single `Result`.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the prompts domain.
    #[error("Prompt error: {0}")]
    Prompt(#[from] crate::domains::prompts::PromptError),

    /// Error from the blob store.
    #[error("Storage error: {0}")]
    Storage(#[from] super::storage::StorageError),

    /// Error from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        use crate::domains::{prompts::PromptError, tools::ToolError};

        matches!(
            self,
            Self::Prompt(PromptError::Validation(_) | PromptError::NotFound(_))
                | Self::Tool(ToolError::Validation(_) | ToolError::NotFound(_))
                | Self::Config(_)
        )
    }
}
