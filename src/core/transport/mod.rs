//! Transports that expose the prompt store.
//!
//! - **STDIO** (feature `stdio`, default): one full MCP session, including
//!   `prompts/list_changed` notifications.
//! - **HTTP** (feature `http`): stateless JSON-RPC over POST, dispatching
//!   tool calls by name.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
