//! Apply prompt tool definition.
//!
//! Substitutes caller-supplied values into a stored prompt.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{parse_arguments, structured_result};
use crate::domains::prompts::PromptRepository;
use crate::domains::tools::ToolError;

/// Parameters for the apply prompt tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApplyPromptParams {
    /// Identifier of the prompt to render.
    pub id: String,

    /// Value for every variable of the prompt, keyed by variable name.
    pub variables: HashMap<String, String>,
}

/// Apply prompt tool - renders a stored prompt with variable values.
pub struct ApplyPromptTool;

impl ApplyPromptTool {
    pub const NAME: &'static str = "apply_prompt";

    pub const DESCRIPTION: &'static str = "Render a stored prompt by substituting a value for each of its {{variables}}. Every variable must be supplied.";

    #[instrument(skip_all, fields(id = %params.id))]
    pub async fn execute(
        params: &ApplyPromptParams,
        repository: &PromptRepository,
    ) -> Result<CallToolResult, ToolError> {
        info!(
            "Apply prompt tool called: '{}' with {} values",
            params.id,
            params.variables.len()
        );

        let applied = repository.apply(&params.id, &params.variables).await?;
        structured_result(applied.content(), &applied)
    }

    pub async fn handle_json(
        arguments: serde_json::Value,
        repository: Arc<PromptRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: ApplyPromptParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await?;
        Ok(serde_json::to_value(&result)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ApplyPromptParams>().into(),
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
                let params: ApplyPromptParams =
                    parse_arguments(serde_json::Value::Object(args)).map_err(McpError::from)?;
                Self::execute(&params, &repository)
                    .await
                    .map_err(McpError::from)
            }
            .boxed()
        })
    }
}
