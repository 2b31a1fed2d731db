//! Add prompt tool definition.
//!
//! Stores a new single-content prompt.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{json_result, parse_arguments};
use crate::domains::prompts::PromptRepository;
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the add prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddPromptParams {
    /// Display name of the prompt.
    pub name: String,

    /// Prompt text. Use {{variable}} for placeholders.
    pub content: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Add prompt tool - stores a single-content prompt.
pub struct AddPromptTool;

impl AddPromptTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add_prompt";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Store a new prompt template. Placeholders written as {{name}} become the prompt's variables.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(name = %params.name))]
    pub async fn execute(
        params: &AddPromptParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        info!("Add prompt tool called: '{}'", params.name);

        let prompt = repository
            .add(&params.name, &params.content, params.description.as_deref())
            .await?;

        json_result(&prompt)
    }

    /// JSON handler used by registry dispatch (HTTP transport).
    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: AddPromptParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AddPromptParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(repository: Arc<PromptRepository>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let repository = repository.clone();
            async move {
                let params: AddPromptParams =
                    parse_arguments(serde_json::Value::Object(args)).map_err(McpError::from)?;
                Self::execute(&params, &repository)
                    .await
                    .map_err(McpError::from)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params(name: &str, content: &str) -> AddPromptParams {
        AddPromptParams {
            name: name.to_string(),
            content: content.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_add_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let repository = PromptRepository::with_root(temp_dir.path());

        let result = AddPromptTool::execute(&params("Greeting", "Hello {{name}}!"), &repository)
            .await
            .unwrap();

        let structured = result.structured_content.expect("structured_content should exist");
        assert_eq!(structured["name"], "Greeting");
        assert_eq!(structured["variables"], serde_json::json!(["name"]));
        assert!(structured["id"].as_str().unwrap().starts_with("prompt-"));
    }

    #[tokio::test]
    async fn test_add_prompt_blank_name() {
        let temp_dir = TempDir::new().unwrap();
        let repository = PromptRepository::with_root(temp_dir.path());

        let result = AddPromptTool::execute(&params(" ", "x"), &repository).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[tokio::test]
    async fn test_handle_json_missing_content() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));

        let result =
            AddPromptTool::handle_json(serde_json::json!({ "name": "x" }), repository).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[test]
    fn test_tool_metadata() {
        let tool = AddPromptTool::to_tool();
        assert_eq!(tool.name, "add_prompt");
        assert!(tool.input_schema.contains_key("properties"));
    }
}
