//! List prompts tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{parse_arguments, structured_result};
use crate::domains::prompts::{Prompt, PromptRepository};
use crate::domains::tools::ToolError;

/// Parameters for the list prompts tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListPromptsParams {}

#[derive(Debug, Serialize)]
struct ListPromptsResult {
    prompts: Vec<Prompt>,
}

/// List prompts tool - returns every stored prompt.
pub struct ListPromptsTool;

impl ListPromptsTool {
    pub const NAME: &'static str = "list_prompts";

    pub const DESCRIPTION: &'static str = "List all stored prompts.";

    #[instrument(skip_all)]
    pub async fn execute(
        _params: &ListPromptsParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        let prompts = repository.list().await?;
        info!("Listing {} prompts", prompts.len());

        let summary = serde_json::to_string_pretty(&prompts)?;
        structured_result(summary, &ListPromptsResult { prompts })
    }

    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: ListPromptsParams = match arguments {
            serde_json::Value::Null => ListPromptsParams::default(),
            arguments => parse_arguments(arguments)?,
        };
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ListPromptsParams>().into(),
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
        ToolRoute::new_dyn(Self::to_tool(), move |_ctx: ToolCallContext<'_, S>| {
            let repository = repository.clone();
            async move {
                Self::execute(&ListPromptsParams::default(), &repository)
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
    async fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        let repository = PromptRepository::with_root(temp_dir.path());
        repository.add("A", "a", None).await.unwrap();
        repository.add("B", "b {{x}}", None).await.unwrap();

        let result = ListPromptsTool::execute(&ListPromptsParams::default(), &repository)
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["prompts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));

        let result = ListPromptsTool::handle_json(serde_json::Value::Null, repository)
            .await
            .unwrap();
        assert_eq!(result["structuredContent"]["prompts"], serde_json::json!([]));
    }
}
