//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the prompts and tools domains.
//!
//! ## Architecture
//!
//! - Tools (`domains/tools/`) are the named operations that manage stored prompts.
//! - The MCP prompts surface lists stored prompts and renders them with arguments.
//! - A [`ChangeNotifier`] watches the storage directory; every initialized
//!   session gets a forwarder task that turns its events into
//!   `notifications/prompts/list_changed`.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::*,
    service::{NotificationContext, Peer, RequestContext},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use crate::domains::{
    prompts::{
        ChangeNotifier, CollectionChanged, NotifierState, PromptRepository, PromptService,
    },
    tools::{ToolError, ToolRegistry, build_tool_router},
};

const INSTRUCTIONS: &str = "Prompt store. Use add_prompt / add_multi_message_prompt to save templates with {{variable}} placeholders, list_prompts / get_prompt to browse them, update_prompt / delete_prompt to manage them, and apply_prompt to render one with values. Stored prompts are also available through prompts/list and prompts/get.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between the domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Name-based tool dispatch for the HTTP transport.
    registry: Arc<ToolRegistry>,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,

    /// Watches the storage directory for changes.
    notifier: Arc<ChangeNotifier>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let repository = Arc::new(PromptRepository::with_root(
            config.prompts.storage_dir.clone(),
        ));
        let prompt_service = Arc::new(PromptService::new(repository.clone()));
        let notifier = Arc::new(ChangeNotifier::new(config.prompts.storage_dir.clone()));

        Self {
            tool_router: build_tool_router::<Self>(repository.clone()),
            registry: Arc::new(ToolRegistry::new(repository)),
            config,
            prompt_service,
            notifier,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Start watching the storage directory, if enabled in the configuration.
    pub fn start_watching(&self) {
        if self.config.prompts.watch {
            self.notifier.start();
        } else {
            info!("Prompt storage watch disabled");
        }
    }

    /// Stop watching the storage directory.
    pub fn stop_watching(&self) {
        self.notifier.stop();
    }

    /// Whether the storage watch is currently running.
    pub fn is_watching(&self) -> bool {
        self.notifier.state() == NotifierState::Watching
    }

    /// Receive storage change events.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<CollectionChanged> {
        self.notifier.subscribe()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        self.registry.call_tool(name, arguments).await
    }

    /// List stored prompts as MCP prompts (for HTTP transport).
    pub async fn list_prompts(&self) -> Result<Vec<serde_json::Value>, ToolError> {
        let prompts = self.prompt_service.list_prompts().await?;

        Ok(prompts
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "title": p.title,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect())
    }

    /// Render a stored prompt (for HTTP transport).
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ToolError> {
        // Convert serde_json::Value to HashMap<String, String>
        let args = arguments.and_then(|v| {
            v.as_object().map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
        });

        let result = self.prompt_service.get_prompt(name, args).await?;
        Ok(serde_json::json!({
            "description": result.description,
            "messages": result.messages
        }))
    }
}

/// Forward storage change events to one client until it goes away.
async fn forward_changes(peer: Peer<RoleServer>, mut changes: broadcast::Receiver<CollectionChanged>) {
    loop {
        match changes.recv().await {
            Ok(CollectionChanged) => {
                if let Err(e) = peer.notify_prompt_list_changed().await {
                    debug!("Stopping change forwarding: {}", e);
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Change forwarder lagged, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// ServerHandler implementation. Tool calls go through the [`ToolRouter`]; a
/// name it does not know is reported as not found, naming the tool.
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_prompts_list_changed()
                .build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(&request.name) {
            warn!("Unknown tool requested: {}", request.name);
            return Err(ToolError::not_found(format!("tool '{}'", request.name)).into());
        }
        let context = ToolCallContext::new(self, request, context);
        self.tool_router.call(context).await
    }

    async fn on_initialized(&self, context: NotificationContext<RoleServer>) {
        info!("Client initialized, forwarding prompt changes");
        tokio::spawn(forward_changes(context.peer.clone(), self.subscribe_changes()));
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self
            .prompt_service
            .list_prompts()
            .await
            .map_err(|e| McpError::from(ToolError::from(e)))?;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        // Convert serde_json::Map to HashMap<String, String>
        let arguments: Option<HashMap<String, String>> = request.arguments.map(|map| {
            map.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect()
        });
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::from(ToolError::from(e)))
    }
}
