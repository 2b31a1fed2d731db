//! Shared helpers for the prompt tools.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domains::tools::ToolError;

/// Deserialize tool arguments, reporting failures as validation errors.
pub fn parse_arguments<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::validation(e.to_string()))
}

/// Successful result with a text summary and the value as structured content.
pub fn structured_result<T: Serialize>(
    summary: impl Into<String>,
    value: &T,
) -> Result<CallToolResult, ToolError> {
    Ok(CallToolResult {
        content: vec![Content::text(summary)],
        structured_content: Some(serde_json::to_value(value)?),
        is_error: Some(false),
        meta: None,
    })
}

/// Successful result whose text is the pretty-printed JSON of `value`.
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, ToolError> {
    let summary = serde_json::to_string_pretty(value)?;
    structured_result(summary, value)
}
