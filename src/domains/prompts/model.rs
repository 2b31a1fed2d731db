//! Prompt data model.
//!
//! A stored prompt is either a single content string or a list of
//! role-tagged messages. The two variants share identity and bookkeeping
//! fields; the `format` discriminator alone decides which one a stored
//! record is.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix of every generated prompt identifier.
pub const ID_PREFIX: &str = "prompt-";

/// Name of the discriminator field on multi-message records.
pub const FORMAT_FIELD: &str = "format";

/// Who speaks a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Kind of payload a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
}

/// Message payload. `text` is required for text messages, `image` for image messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MessageContent {
    /// Payload kind: "text" or "image".
    #[serde(rename = "type")]
    pub kind: ContentKind,

    /// Text with optional {{variable}} placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Image reference (URL or base64 data).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MessageContent {
    /// Text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            text: Some(text.into()),
            image: None,
        }
    }

    /// Image payload.
    pub fn image(image: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Image,
            text: None,
            image: Some(image.into()),
        }
    }

    /// Whether the field required by `kind` is present.
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            ContentKind::Text => self.text.is_some(),
            ContentKind::Image => self.image.is_some(),
        }
    }
}

/// One message of a multi-message prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// "user" or "assistant".
    pub role: Role,

    /// The message payload.
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: Role, content: MessageContent) -> Self {
        Self { role, content }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::text(text))
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::text(text))
    }
}

/// Discriminator value carried by every multi-message record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiMessageFormat {
    #[default]
    #[serde(rename = "multi-message")]
    MultiMessage,
}

/// A prompt with a single content string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePrompt {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variables: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub content: String,
}

/// A prompt made of an ordered list of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiMessagePrompt {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variables: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub format: MultiMessageFormat,
    pub messages: Vec<Message>,
}

/// A stored prompt of either shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prompt {
    Single(SinglePrompt),
    MultiMessage(MultiMessagePrompt),
}

impl<'de> Deserialize<'de> for Prompt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if value.get(FORMAT_FIELD).is_some() {
            MultiMessagePrompt::deserialize(value)
                .map(Prompt::MultiMessage)
                .map_err(D::Error::custom)
        } else {
            SinglePrompt::deserialize(value)
                .map(Prompt::Single)
                .map_err(D::Error::custom)
        }
    }
}

impl Prompt {
    pub fn id(&self) -> &str {
        match self {
            Self::Single(p) => &p.id,
            Self::MultiMessage(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Single(p) => &p.name,
            Self::MultiMessage(p) => &p.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Single(p) => &p.description,
            Self::MultiMessage(p) => &p.description,
        }
    }

    /// Placeholder names in first-occurrence order.
    pub fn variables(&self) -> &[String] {
        match self {
            Self::Single(p) => &p.variables,
            Self::MultiMessage(p) => &p.variables,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Single(p) => p.created_at,
            Self::MultiMessage(p) => p.created_at,
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Single(p) => p.updated_at,
            Self::MultiMessage(p) => p.updated_at,
        }
    }

    pub fn is_multi_message(&self) -> bool {
        matches!(self, Self::MultiMessage(_))
    }

    /// Storage key of a prompt id.
    pub fn storage_key(id: &str) -> String {
        format!("{}.json", id)
    }
}
