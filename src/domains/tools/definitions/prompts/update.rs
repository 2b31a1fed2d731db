//! Update prompt tool definition.
//!
//! Patches name/description or replaces messages. Supplying messages for a
//! single-content prompt converts it to a multi-message prompt.

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
use crate::domains::prompts::{Message, Prompt, PromptRepository, PromptUpdate};
use crate::domains::tools::ToolError;

/// Parameters for the update prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdatePromptParams {
    /// Identifier of the prompt to update.
    pub id: String,

    /// New display name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// Replacement messages. Converts a single-content prompt to multi-message.
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

#[derive(Debug, Serialize)]
struct UpdateResult {
    success: bool,
    message: String,
    prompt: Prompt,
}

/// Update prompt tool - modifies a stored prompt.
pub struct UpdatePromptTool;

impl UpdatePromptTool {
    pub const NAME: &'static str = "update_prompt";

    pub const DESCRIPTION: &'static str = "Update a stored prompt's name, description, or messages. Supplying messages for a single-content prompt converts it to a multi-message prompt.";

    #[instrument(skip_all, fields(id = %params.id))]
    pub async fn execute(
        params: &UpdatePromptParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        info!("Update prompt tool called: '{}'", params.id);

        let update = PromptUpdate {
            name: params.name.clone(),
            description: params.description.clone(),
            messages: params.messages.clone(),
        };
        let prompt = repository.update(&params.id, update).await?;

        let result = UpdateResult {
            success: true,
            message: format!("Prompt {} updated successfully", params.id),
            prompt,
        };
        structured_result(serde_json::to_string_pretty(&result)?, &result)
    }

    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: UpdatePromptParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<UpdatePromptParams>().into(),
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
                let params: UpdatePromptParams =
                    parse_arguments(serde_json::Value::Object(args)).map_err(McpError::from)?;
                Self::execute(&params, &repository)
                    .await
                    .map_err(McpError::from)
            }
            .boxed()
        })
    }
}
