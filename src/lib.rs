//! Prompt store MCP server.
//!
//! Stores prompt templates with `{{variable}}` placeholders as JSON files,
//! renders them with caller-supplied values and tells connected clients
//! when the stored collection changes.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, blob storage, the MCP server handler and transports
//! - **domains**
//!   - **prompts**: prompt model, template engine, repository, change notifier
//!   - **tools**: one MCP tool per repository operation, plus name-based dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use prompt_store_mcp_server::domains::prompts::PromptRepository;
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repository = PromptRepository::with_root("prompts");
//!     let prompt = repository.add("Greeting", "Hello {{name}}!", None).await?;
//!
//!     let values = HashMap::from([("name".to_string(), "Ada".to_string())]);
//!     let applied = repository.apply(prompt.id(), &values).await?;
//!     assert_eq!(applied.content(), "Hello Ada!");
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
