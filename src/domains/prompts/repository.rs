//! Prompt repository.
//!
//! Owns the lifecycle of stored prompts: creation, lookup, listing, update
//! (including single-content to multi-message conversion), deletion, and
//! variable application. Every prompt is persisted as one JSON blob keyed
//! by `<id>.json`.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::PromptError;
use super::model::{
    ID_PREFIX, Message, MultiMessageFormat, MultiMessagePrompt, Prompt, SinglePrompt,
};
use super::templates::{
    extract_variables, extract_variables_from_messages, render_messages, substitute,
    substitute_messages, validate_message_shape,
};
use crate::core::storage::{BlobStore, FsBlobStore, StorageError};

/// Attempts at drawing an unused identifier before giving up.
const ID_ATTEMPTS: usize = 16;

/// Partial update of a stored prompt. At least one field must be set.
#[derive(Debug, Clone, Default)]
pub struct PromptUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub messages: Option<Vec<Message>>,
}

impl PromptUpdate {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.messages.is_none()
    }
}

/// Result of applying variable values to a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AppliedPrompt {
    /// Substituted text of a single-content prompt.
    Text { content: String },

    /// Substituted messages of a multi-message prompt plus their JSON rendering.
    Messages {
        messages: Vec<Message>,
        content: String,
    },
}

impl AppliedPrompt {
    /// The flat text form of the result.
    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } | Self::Messages { content, .. } => content,
        }
    }
}

/// Repository of stored prompts on top of a blob store.
#[derive(Clone)]
pub struct PromptRepository {
    store: Arc<dyn BlobStore>,
}

impl PromptRepository {
    /// Create a repository over the given blob store.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Create a repository storing prompts as files under `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsBlobStore::new(root)))
    }

    /// Create a single-content prompt.
    #[instrument(skip(self, content, description))]
    pub async fn add(
        &self,
        name: &str,
        content: &str,
        description: Option<&str>,
    ) -> Result<Prompt, PromptError> {
        let name = required(name, "name")?;
        if content.trim().is_empty() {
            return Err(PromptError::validation("content must not be empty"));
        }

        let prompt = Prompt::Single(SinglePrompt {
            id: self.next_id().await?,
            name,
            description: normalize_description(description),
            variables: extract_variables(content),
            created_at: Utc::now(),
            updated_at: None,
            content: content.to_string(),
        });

        self.persist(&prompt).await?;
        info!("Created prompt {}", prompt.id());
        Ok(prompt)
    }

    /// Create a multi-message prompt.
    #[instrument(skip(self, description, messages), fields(count = messages.len()))]
    pub async fn add_multi_message(
        &self,
        name: &str,
        description: Option<&str>,
        messages: Vec<Message>,
    ) -> Result<Prompt, PromptError> {
        let name = required(name, "name")?;
        check_messages(&messages)?;

        let prompt = Prompt::MultiMessage(MultiMessagePrompt {
            id: self.next_id().await?,
            name,
            description: normalize_description(description),
            variables: extract_variables_from_messages(&messages),
            created_at: Utc::now(),
            updated_at: None,
            format: MultiMessageFormat::MultiMessage,
            messages,
        });

        self.persist(&prompt).await?;
        info!("Created multi-message prompt {}", prompt.id());
        Ok(prompt)
    }

    /// Fetch a prompt by id.
    pub async fn get(&self, id: &str) -> Result<Prompt, PromptError> {
        let bytes = match self.store.get(&Prompt::storage_key(id)).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) | Err(StorageError::InvalidKey(_)) => return Err(PromptError::not_found(id)),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// List every stored prompt. Unreadable blobs are logged and skipped.
    pub async fn list(&self) -> Result<Vec<Prompt>, PromptError> {
        let keys = self.store.list_keys().await?;
        let mut prompts = Vec::with_capacity(keys.len());

        for key in keys.iter().filter(|k| k.ends_with(".json")) {
            match self.store.get(key).await {
                Ok(Some(bytes)) => match serde_json::from_slice::<Prompt>(&bytes) {
                    Ok(prompt) => prompts.push(prompt),
                    Err(e) => warn!("Skipping unreadable prompt blob '{}': {}", key, e),
                },
                Ok(None) => debug!("Prompt blob '{}' disappeared while listing", key),
                Err(e) => warn!("Skipping prompt blob '{}': {}", key, e),
            }
        }

        Ok(prompts)
    }

    /// Delete a prompt by id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), PromptError> {
        match self.store.delete(&Prompt::storage_key(id)).await {
            Ok(true) => {
                info!("Deleted prompt {}", id);
                Ok(())
            }
            Ok(false) | Err(StorageError::InvalidKey(_)) => Err(PromptError::not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Update a prompt. Supplying messages for a single-content prompt converts it
    /// into a multi-message prompt; the reverse never happens.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: PromptUpdate) -> Result<Prompt, PromptError> {
        if update.is_empty() {
            return Err(PromptError::validation(
                "at least one of name, description, or messages must be provided",
            ));
        }

        let name = update.name.as_deref().map(|n| required(n, "name")).transpose()?;
        let description = update.description.as_deref().map(|d| d.trim().to_string());
        if let Some(messages) = &update.messages {
            check_messages(messages)?;
        }

        let existing = self.get(id).await?;
        let now = Utc::now();

        let updated = match (existing, update.messages) {
            (Prompt::MultiMessage(mut prompt), messages) => {
                if let Some(messages) = messages {
                    prompt.variables = extract_variables_from_messages(&messages);
                    prompt.messages = messages;
                }
                if let Some(name) = name {
                    prompt.name = name;
                }
                if let Some(description) = description {
                    prompt.description = description;
                }
                prompt.updated_at = Some(now);
                Prompt::MultiMessage(prompt)
            }
            (Prompt::Single(prompt), Some(messages)) => {
                info!("Converting prompt {} to multi-message", prompt.id);
                Prompt::MultiMessage(MultiMessagePrompt {
                    id: prompt.id,
                    name: name.unwrap_or(prompt.name),
                    description: description.unwrap_or(prompt.description),
                    variables: extract_variables_from_messages(&messages),
                    created_at: prompt.created_at,
                    updated_at: Some(now),
                    format: MultiMessageFormat::MultiMessage,
                    messages,
                })
            }
            (Prompt::Single(mut prompt), None) => {
                if let Some(name) = name {
                    prompt.name = name;
                }
                if let Some(description) = description {
                    prompt.description = description;
                }
                prompt.updated_at = Some(now);
                Prompt::Single(prompt)
            }
        };

        self.persist(&updated).await?;
        info!("Updated prompt {}", id);
        Ok(updated)
    }

    /// Substitute `values` into a stored prompt. Every derived variable must have a value.
    #[instrument(skip(self, values))]
    pub async fn apply(
        &self,
        id: &str,
        values: &HashMap<String, String>,
    ) -> Result<AppliedPrompt, PromptError> {
        let prompt = self.get(id).await?;
        Self::apply_to(&prompt, values)
    }

    /// Substitute `values` into an already loaded prompt.
    pub fn apply_to(
        prompt: &Prompt,
        values: &HashMap<String, String>,
    ) -> Result<AppliedPrompt, PromptError> {
        let missing: Vec<&str> = prompt
            .variables()
            .iter()
            .filter(|name| !values.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(PromptError::validation(format!(
                "Missing required variables: {}",
                missing.join(", ")
            )));
        }

        match prompt {
            Prompt::Single(prompt) => Ok(AppliedPrompt::Text {
                content: substitute(&prompt.content, values),
            }),
            Prompt::MultiMessage(prompt) => {
                let messages = substitute_messages(&prompt.messages, values);
                let content = render_messages(&messages)?;
                Ok(AppliedPrompt::Messages { messages, content })
            }
        }
    }

    async fn persist(&self, prompt: &Prompt) -> Result<(), PromptError> {
        let bytes = serde_json::to_vec_pretty(prompt)?;
        self.store
            .put(&Prompt::storage_key(prompt.id()), &bytes)
            .await?;
        Ok(())
    }

    async fn next_id(&self) -> Result<String, PromptError> {
        for _ in 0..ID_ATTEMPTS {
            let id = format!("{}{:08x}", ID_PREFIX, rand::random::<u32>());
            if self.store.get(&Prompt::storage_key(&id)).await?.is_none() {
                return Ok(id);
            }
        }
        Err(PromptError::internal("could not allocate an unused prompt id"))
    }
}

fn required(value: &str, field: &str) -> Result<String, PromptError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PromptError::validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn normalize_description(description: Option<&str>) -> String {
    description.map(str::trim).unwrap_or_default().to_string()
}

fn check_messages(messages: &[Message]) -> Result<(), PromptError> {
    if messages.is_empty() {
        return Err(PromptError::validation("messages must not be empty"));
    }
    if !validate_message_shape(messages) {
        return Err(PromptError::validation(
            "every message needs `text` for type \"text\" and `image` for type \"image\"",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prompts::model::{ContentKind, MessageContent, Role};
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn repository() -> (TempDir, PromptRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PromptRepository::with_root(temp_dir.path());
        (temp_dir, repo)
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn chat() -> Vec<Message> {
        vec![Message::assistant_text("Hi {{x}}"), Message::user_text("Do {{y}}")]
    }

    #[tokio::test]
    async fn test_add_and_apply_greeting() {
        let (_dir, repo) = repository();

        let prompt = repo.add("Greeting", "Hello {{name}}!", None).await.unwrap();
        assert_eq!(prompt.variables(), ["name"]);
        assert!(prompt.updated_at().is_none());

        let id = prompt.id();
        assert!(id.starts_with(ID_PREFIX));
        let suffix = &id[ID_PREFIX.len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let applied = repo.apply(id, &values(&[("name", "Ana")])).await.unwrap();
        assert_eq!(applied, AppliedPrompt::Text { content: "Hello Ana!".to_string() });
    }

    #[tokio::test]
    async fn test_add_rejects_blank_fields() {
        let (_dir, repo) = repository();

        let err = repo.add("   ", "content", None).await.unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));

        let err = repo.add("name", " \n ", None).await.unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_then_get_round_trip() {
        let (_dir, repo) = repository();

        let added = repo
            .add("  Padded  ", "Body {{a}}", Some(" desc "))
            .await
            .unwrap();
        assert_eq!(added.name(), "Padded");
        assert_eq!(added.description(), "desc");

        let fetched = repo.get(added.id()).await.unwrap();
        assert_eq!(fetched, added);
    }

    #[tokio::test]
    async fn test_add_multi_message_derives_variables() {
        let (_dir, repo) = repository();

        let prompt = repo.add_multi_message("Chat", None, chat()).await.unwrap();
        assert!(prompt.is_multi_message());
        assert_eq!(prompt.variables(), ["x", "y"]);

        let fetched = repo.get(prompt.id()).await.unwrap();
        assert_eq!(fetched, prompt);
    }

    #[tokio::test]
    async fn test_add_multi_message_rejects_empty_and_malformed() {
        let (_dir, repo) = repository();

        let err = repo.add_multi_message("Chat", None, vec![]).await.unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));

        let malformed = vec![Message::new(
            Role::User,
            MessageContent {
                kind: ContentKind::Text,
                text: None,
                image: None,
            },
        )];
        let err = repo
            .add_multi_message("Chat", None, malformed)
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));

        let err = repo.add_multi_message("", None, chat()).await.unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_and_delete_missing() {
        let (_dir, repo) = repository();

        let err = repo.delete("prompt-00000000").await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
        let err = repo.get("prompt-00000000").await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_id_is_not_found() {
        let (_dir, repo) = repository();
        let err = repo.get("../outside").await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_blob() {
        let (dir, repo) = repository();

        let prompt = repo.add("A", "a", None).await.unwrap();
        let path = dir.path().join(format!("{}.json", prompt.id()));
        assert!(path.exists());

        assert_ok!(repo.delete(prompt.id()).await);
        assert!(!path.exists());
        assert!(matches!(
            repo.get(prompt.id()).await,
            Err(PromptError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_blobs() {
        let (dir, repo) = repository();

        let a = repo.add("A", "a", None).await.unwrap();
        let b = repo.add_multi_message("B", None, chat()).await.unwrap();
        std::fs::write(dir.path().join("prompt-broken00.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut ids: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        ids.sort();

        let mut expected = vec![a.id().to_string(), b.id().to_string()];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (_dir, repo) = repository();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let (_dir, repo) = repository();
        let prompt = repo.add("A", "a", None).await.unwrap();

        let err = repo
            .update(prompt.id(), PromptUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_prompt() {
        let (_dir, repo) = repository();
        let update = PromptUpdate {
            name: Some("x".to_string()),
            ..Default::default()
        };
        let err = repo.update("prompt-00000000", update).await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_single_patches_metadata_only() {
        let (_dir, repo) = repository();
        let original = repo.add("A", "Hello {{who}}", None).await.unwrap();

        let update = PromptUpdate {
            name: Some("Renamed".to_string()),
            description: Some("now described".to_string()),
            messages: None,
        };
        let updated = repo.update(original.id(), update).await.unwrap();

        let Prompt::Single(updated) = updated else {
            panic!("expected single-content prompt");
        };
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description, "now described");
        assert_eq!(updated.content, "Hello {{who}}");
        assert_eq!(updated.variables, vec!["who"]);
        assert_eq!(updated.created_at, original.created_at());
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_single_with_messages_converts() {
        let (_dir, repo) = repository();
        let original = repo.add("A", "Hello {{who}}", Some("d")).await.unwrap();

        let update = PromptUpdate {
            messages: Some(chat()),
            ..Default::default()
        };
        let updated = repo.update(original.id(), update).await.unwrap();

        assert!(updated.is_multi_message());
        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.name(), "A");
        assert_eq!(updated.description(), "d");
        assert_eq!(updated.created_at(), original.created_at());
        assert_eq!(updated.variables(), ["x", "y"]);

        let stored = serde_json::to_value(repo.get(original.id()).await.unwrap()).unwrap();
        assert_eq!(stored["format"], "multi-message");
        assert!(stored.get("content").is_none());
    }

    #[tokio::test]
    async fn test_update_multi_message_replaces_messages() {
        let (_dir, repo) = repository();
        let original = repo.add_multi_message("Chat", None, chat()).await.unwrap();

        let update = PromptUpdate {
            messages: Some(vec![Message::user_text("Only {{z}}")]),
            ..Default::default()
        };
        let updated = repo.update(original.id(), update).await.unwrap();

        let Prompt::MultiMessage(updated) = updated else {
            panic!("expected multi-message prompt");
        };
        assert_eq!(updated.messages.len(), 1);
        assert_eq!(updated.variables, vec!["z"]);
        assert_eq!(updated.name, "Chat");
    }

    #[tokio::test]
    async fn test_update_multi_message_metadata_keeps_messages() {
        let (_dir, repo) = repository();
        let original = repo.add_multi_message("Chat", None, chat()).await.unwrap();

        let update = PromptUpdate {
            name: Some("Chat 2".to_string()),
            ..Default::default()
        };
        let updated = repo.update(original.id(), update).await.unwrap();

        let Prompt::MultiMessage(updated) = updated else {
            panic!("expected multi-message prompt");
        };
        assert_eq!(updated.name, "Chat 2");
        assert_eq!(updated.messages, chat());
        assert_eq!(updated.variables, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_messages() {
        let (_dir, repo) = repository();
        let original = repo.add("A", "a", None).await.unwrap();

        let update = PromptUpdate {
            messages: Some(vec![]),
            ..Default::default()
        };
        let err = repo.update(original.id(), update).await.unwrap_err();
        assert!(matches!(err, PromptError::Validation(_)));

        let still_single = repo.get(original.id()).await.unwrap();
        assert!(!still_single.is_multi_message());
    }

    #[tokio::test]
    async fn test_apply_lists_missing_variables_in_order() {
        let (_dir, repo) = repository();
        let prompt = repo
            .add("A", "{{first}} {{second}} {{third}}", None)
            .await
            .unwrap();

        let err = repo
            .apply(prompt.id(), &values(&[("second", "2")]))
            .await
            .unwrap_err();
        match err {
            PromptError::Validation(msg) => assert!(msg.ends_with("first, third")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_apply_missing_prompt() {
        let (_dir, repo) = repository();
        let err = repo
            .apply("prompt-00000000", &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_multi_message() {
        let (_dir, repo) = repository();
        let prompt = repo.add_multi_message("Chat", None, chat()).await.unwrap();

        let applied = repo
            .apply(prompt.id(), &values(&[("x", "there"), ("y", "work")]))
            .await
            .unwrap();

        let AppliedPrompt::Messages { messages, content } = applied else {
            panic!("expected messages");
        };
        assert_eq!(messages[0].content.text.as_deref(), Some("Hi there"));
        assert_eq!(messages[1].content.text.as_deref(), Some("Do work"));
        assert!(content.contains("Hi there"));
        assert!(!content.contains("{{"));
    }
}
