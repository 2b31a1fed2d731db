//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The fixed set of named operations
//! - Dispatch of a call by tool name (used by the HTTP transport)
//! - Tool metadata for listing

use std::sync::Arc;
use tracing::warn;

use rmcp::model::Tool;

use super::definitions::{
    AddMultiMessagePromptTool, AddPromptTool, ApplyPromptTool, DeletePromptTool, GetPromptTool,
    ListPromptsTool, UpdatePromptTool,
};
use super::error::ToolError;
use crate::domains::prompts::PromptRepository;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    repository: Arc<PromptRepository>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(repository: Arc<PromptRepository>) -> Self {
        Self { repository }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            AddPromptTool::NAME,
            AddMultiMessagePromptTool::NAME,
            GetPromptTool::NAME,
            ListPromptsTool::NAME,
            DeletePromptTool::NAME,
            UpdatePromptTool::NAME,
            ApplyPromptTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            AddPromptTool::to_tool(),
            AddMultiMessagePromptTool::to_tool(),
            GetPromptTool::to_tool(),
            ListPromptsTool::to_tool(),
            DeletePromptTool::to_tool(),
            UpdatePromptTool::to_tool(),
            ApplyPromptTool::to_tool(),
        ]
    }

    /// Dispatch a tool call by name.
    ///
    /// Returns the serialized `CallToolResult`. Unknown names fail with
    /// [`ToolError::NotFound`].
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let repository = self.repository.clone();
        match name {
            AddPromptTool::NAME => AddPromptTool::handle_json(arguments, repository).await,
            AddMultiMessagePromptTool::NAME => {
                AddMultiMessagePromptTool::handle_json(arguments, repository).await
            }
            GetPromptTool::NAME => GetPromptTool::handle_json(arguments, repository).await,
            ListPromptsTool::NAME => ListPromptsTool::handle_json(arguments, repository).await,
            DeletePromptTool::NAME => DeletePromptTool::handle_json(arguments, repository).await,
            UpdatePromptTool::NAME => UpdatePromptTool::handle_json(arguments, repository).await,
            ApplyPromptTool::NAME => ApplyPromptTool::handle_json(arguments, repository).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(format!("tool '{}'", name)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn registry() -> (TempDir, ToolRegistry) {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));
        (temp_dir, ToolRegistry::new(repository))
    }

    #[test]
    fn test_registry_tool_names() {
        let (_dir, registry) = registry();
        let names = registry.tool_names();
        assert_eq!(names.len(), 7);
        assert_eq!(ToolRegistry::get_all_tools().len(), 7);
        assert!(names.contains(&"add_prompt"));
        assert!(names.contains(&"apply_prompt"));
    }

    #[tokio::test]
    async fn test_registry_call_unknown() {
        let (_dir, registry) = registry();
        let result = registry.call_tool("rename_prompt", json!({})).await;
        match result {
            Err(ToolError::NotFound(msg)) => assert!(msg.contains("rename_prompt")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registry_greeting_scenario() {
        let (_dir, registry) = registry();

        let added = registry
            .call_tool(
                "add_prompt",
                json!({ "name": "Greeting", "content": "Hello {{name}}!" }),
            )
            .await
            .unwrap();
        let prompt = &added["structuredContent"];
        assert_eq!(prompt["variables"], json!(["name"]));

        let applied = registry
            .call_tool(
                "apply_prompt",
                json!({ "id": prompt["id"], "variables": { "name": "Ana" } }),
            )
            .await
            .unwrap();
        assert_eq!(applied["structuredContent"]["content"], "Hello Ana!");
    }

    #[tokio::test]
    async fn test_registry_delete_then_get_missing() {
        let (_dir, registry) = registry();

        let result = registry
            .call_tool("delete_prompt", json!({ "id": "prompt-12345678" }))
            .await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));

        let result = registry
            .call_tool("get_prompt", json!({ "id": "prompt-12345678" }))
            .await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_registry_empty_messages_rejected() {
        let (_dir, registry) = registry();
        let result = registry
            .call_tool(
                "add_multi_message_prompt",
                json!({ "name": "Chat", "messages": [] }),
            )
            .await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }
}
