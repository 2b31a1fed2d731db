//! Get prompt tool definition.

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

/// Parameters for the get prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPromptParams {
    /// Prompt identifier (e.g. "prompt-1a2b3c4d").
    pub id: String,
}

/// Get prompt tool - fetches a stored prompt by id.
pub struct GetPromptTool;

impl GetPromptTool {
    pub const NAME: &'static str = "get_prompt";

    pub const DESCRIPTION: &'static str = "Fetch a stored prompt by its id.";

    #[instrument(skip_all, fields(id = %params.id))]
    pub async fn execute(
        params: &GetPromptParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        info!("Get prompt tool called: '{}'", params.id);
        let prompt = repository.get(&params.id).await?;
        json_result(&prompt)
    }

    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetPromptParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetPromptParams>().into(),
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
                let params: GetPromptParams =
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
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_existing_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let repository = PromptRepository::with_root(temp_dir.path());
        let stored = repository.add("A", "Body", None).await.unwrap();

        let params = GetPromptParams {
            id: stored.id().to_string(),
        };
        let result = GetPromptTool::execute(&params, &repository).await.unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured, serde_json::to_value(&stored).unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let repository = PromptRepository::with_root(temp_dir.path());

        let params = GetPromptParams {
            id: "prompt-00000000".to_string(),
        };
        let result = GetPromptTool::execute(&params, &repository).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }
}
