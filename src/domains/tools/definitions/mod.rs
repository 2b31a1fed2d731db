//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod prompts;

pub use prompts::{
    AddMultiMessagePromptTool, AddPromptTool, ApplyPromptTool, DeletePromptTool, GetPromptTool,
    ListPromptsTool, UpdatePromptTool,
};
