//! Delete prompt tool definition.
//!
//! Removes a stored prompt and its persisted blob.

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
use crate::domains::prompts::PromptRepository;
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the delete prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePromptParams {
    /// Identifier of the prompt to delete.
    pub id: String,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of a delete operation
#[derive(Debug, Serialize, JsonSchema)]
struct DeleteResult {
    /// Whether the operation succeeded
    success: bool,
    /// Human-readable outcome
    message: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Delete prompt tool - deletes a stored prompt.
pub struct DeletePromptTool;

impl DeletePromptTool {
    pub const NAME: &'static str = "delete_prompt";

    pub const DESCRIPTION: &'static str = "Delete a stored prompt by its id.";

    #[instrument(skip_all, fields(id = %params.id))]
    pub async fn execute(
        params: &DeletePromptParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        info!("Delete prompt tool called: '{}'", params.id);

        repository.delete(&params.id).await?;

        let result = DeleteResult {
            success: true,
            message: format!("Prompt {} deleted successfully", params.id),
        };
        structured_result(result.message.clone(), &result)
    }

    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: DeletePromptParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<DeletePromptParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<DeleteResult>().into()),
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
                let params: DeletePromptParams =
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
