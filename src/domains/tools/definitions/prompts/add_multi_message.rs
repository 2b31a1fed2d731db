//! Add multi-message prompt tool definition.

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
use crate::domains::prompts::{Message, PromptRepository};
use crate::domains::tools::ToolError;

/// Parameters for the add multi-message prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddMultiMessagePromptParams {
    /// Display name of the prompt.
    pub name: String,

    /// Ordered conversation messages. Text messages may contain {{variable}} placeholders.
    pub messages: Vec<Message>,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Add multi-message prompt tool - stores a conversation template.
pub struct AddMultiMessagePromptTool;

impl AddMultiMessagePromptTool {
    pub const NAME: &'static str = "add_multi_message_prompt";

    pub const DESCRIPTION: &'static str = "Store a new multi-message prompt made of user/assistant messages with text or image content.";

    #[instrument(skip_all, fields(name = %params.name, messages = params.messages.len()))]
    pub async fn execute(
        params: &AddMultiMessagePromptParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        info!("Add multi-message prompt tool called: '{}'", params.name);

        let prompt = repository
            .add_multi_message(
                &params.name,
                params.description.as_deref(),
                params.messages.clone(),
            )
            .await?;

        json_result(&prompt)
    }

    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: AddMultiMessagePromptParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AddMultiMessagePromptParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(repository: Arc<PromptRepository>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let repository = repository.clone();
            async move {
                let params: AddMultiMessagePromptParams =
                    parse_arguments(serde_json::Value::Object(args)).map_err(McpError::from)?;
                Self::execute(&params, &repository)
                    .await
                    .map_err(McpError::from)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_add_multi_message_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));

        let args = json!({
            "name": "Chat",
            "messages": [
                { "role": "assistant", "content": { "type": "text", "text": "Hi {{x}}" } },
                { "role": "user", "content": { "type": "text", "text": "Do {{y}}" } }
            ]
        });
        let result = AddMultiMessagePromptTool::handle_json(args, repository)
            .await
            .unwrap();

        let structured = &result["structuredContent"];
        assert_eq!(structured["variables"], json!(["x", "y"]));
        assert_eq!(structured["format"], "multi-message");
    }

    #[tokio::test]
    async fn test_empty_messages_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));

        let args = json!({ "name": "Chat", "messages": [] });
        let result = AddMultiMessagePromptTool::handle_json(args, repository).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));

        let args = json!({
            "name": "Chat",
            "messages": [{ "role": "system", "content": { "type": "text", "text": "x" } }]
        });
        let result = AddMultiMessagePromptTool::handle_json(args, repository).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }
}
