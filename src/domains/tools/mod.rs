//! Tools domain module.
//!
//! The tools are the operation surface of the prompt store: every repository
//! operation is exposed as one named MCP tool with a JSON schema for its
//! arguments.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - Dynamic ToolRouter builder for the MCP session (STDIO)
//! - `registry.rs` - Central tool registry and name-based dispatch
//! - `error.rs` - Tool error taxonomy and its MCP / JSON-RPC mapping
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/prompts/` (e.g., `my_tool.rs`)
//! 2. Define params, execute(), and handle_json()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs`

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::{INTERNAL_ERROR, INVALID_PARAMS, RESOURCE_NOT_FOUND, ToolError};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
