//! Prompt service implementation.
//!
//! The PromptService exposes stored prompts through the MCP prompts surface:
//! every stored prompt is listed as an MCP prompt whose arguments are its
//! variables, and fetching one applies the supplied arguments.

use rmcp::model::{
    GetPromptResult, Prompt as McpPrompt, PromptArgument, PromptMessage, PromptMessageRole,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::error::PromptError;
use super::model::{ContentKind, Message, Prompt, Role};
use super::repository::{AppliedPrompt, PromptRepository};

/// Service for listing and instantiating stored prompts over MCP.
pub struct PromptService {
    repository: Arc<PromptRepository>,
}

impl PromptService {
    /// Create a new PromptService over the given repository.
    pub fn new(repository: Arc<PromptRepository>) -> Self {
        info!("Initializing PromptService");
        Self { repository }
    }

    /// List all stored prompts as MCP prompts.
    pub async fn list_prompts(&self) -> Result<Vec<McpPrompt>, PromptError> {
        let prompts = self.repository.list().await?;
        Ok(prompts.iter().map(to_mcp_prompt).collect())
    }

    /// Get a stored prompt with arguments substituted.
    pub async fn get_prompt(
        &self,
        id: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let prompt = self.repository.get(id).await?;
        let arguments = arguments.unwrap_or_default();

        let messages = match PromptRepository::apply_to(&prompt, &arguments)? {
            AppliedPrompt::Text { content } => {
                vec![PromptMessage::new_text(PromptMessageRole::User, content)]
            }
            AppliedPrompt::Messages { messages, .. } => {
                messages.iter().map(to_mcp_message).collect()
            }
        };

        Ok(GetPromptResult {
            description: non_empty(prompt.description()),
            messages,
        })
    }
}

fn to_mcp_prompt(prompt: &Prompt) -> McpPrompt {
    let arguments = prompt
        .variables()
        .iter()
        .map(|name| PromptArgument {
            name: name.clone(),
            title: None,
            description: None,
            required: Some(true),
        })
        .collect();

    McpPrompt {
        name: prompt.id().to_string(),
        title: Some(prompt.name().to_string()),
        description: non_empty(prompt.description()),
        arguments: Some(arguments),
        icons: None,
        meta: None,
    }
}

fn to_mcp_message(message: &Message) -> PromptMessage {
    let role = match message.role {
        Role::User => PromptMessageRole::User,
        Role::Assistant => PromptMessageRole::Assistant,
    };

    let text = match message.content.kind {
        ContentKind::Text => message.content.text.clone().unwrap_or_default(),
        ContentKind::Image => format!(
            "[image: {}]",
            message.content.image.as_deref().unwrap_or_default()
        ),
    };

    PromptMessage::new_text(role, text)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
