//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AddMultiMessagePromptTool, AddPromptTool, ApplyPromptTool, DeletePromptTool, GetPromptTool,
    ListPromptsTool, UpdatePromptTool,
};
use crate::domains::prompts::PromptRepository;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(repository: Arc<PromptRepository>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(AddPromptTool::create_route(repository.clone()))
        .with_route(AddMultiMessagePromptTool::create_route(repository.clone()))
        .with_route(GetPromptTool::create_route(repository.clone()))
        .with_route(ListPromptsTool::create_route(repository.clone()))
        .with_route(DeletePromptTool::create_route(repository.clone()))
        .with_route(UpdatePromptTool::create_route(repository.clone()))
        .with_route(ApplyPromptTool::create_route(repository))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use tempfile::TempDir;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));

        let router: ToolRouter<TestServer> = build_tool_router(repository);
        let tools = router.list_all();
        assert_eq!(tools.len(), 7);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"add_prompt"));
        assert!(names.contains(&"add_multi_message_prompt"));
        assert!(names.contains(&"get_prompt"));
        assert!(names.contains(&"list_prompts"));
        assert!(names.contains(&"delete_prompt"));
        assert!(names.contains(&"update_prompt"));
        assert!(names.contains(&"apply_prompt"));
    }

    #[test]
    fn test_registry_matches_router() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(PromptRepository::with_root(temp_dir.path()));
        let registry = ToolRegistry::new(repository.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(repository);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
