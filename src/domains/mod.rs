//! Domains module containing business logic organized by bounded contexts.
//!
//! - **prompts**: Stored prompt templates, the template engine, persistence,
//!   and change notification
//! - **tools**: The named MCP operations clients call to manage prompts

pub mod prompts;
pub mod tools;
