//! Prompts domain module.
//!
//! This module owns the stored prompt templates: their data model, the
//! `{{variable}}` template engine, persistence, and change notification.
//!
//! ## Architecture
//!
//! - `model.rs` - Single-content / multi-message prompt types
//! - `templates.rs` - Variable extraction, substitution, message shape checks
//! - `repository.rs` - Create, read, list, update, delete, apply
//! - `notifier.rs` - Background watch of the storage directory
//! - `service.rs` - Stored prompts exposed through MCP `prompts/*`

mod error;
pub mod model;
pub mod notifier;
mod repository;
mod service;
pub mod templates;

pub use error::PromptError;
pub use model::{ContentKind, Message, MessageContent, Prompt, Role};
pub use notifier::{ChangeNotifier, CollectionChanged, NotifierState};
pub use repository::{AppliedPrompt, PromptRepository, PromptUpdate};
pub use service::PromptService;
