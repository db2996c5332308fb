//! MCP Server implementation and lifecycle management.
//!
//! The handler owns the tool router; tool calls are dispatched by the
//! `#[tool_handler]` macro for STDIO/TCP and by [`ToolRegistry`] for HTTP.
//! Adding a tool does not require changes here.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::error::Result as CoreResult;
use crate::domains::tools::{ToolContext, build_tool_router};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

const INSTRUCTIONS: &str = "Read-only access to Canvas LMS for the user that owns the \
configured API token: courses, syllabi, modules, assignments, people, the dashboard, \
calendar events and course files. Large lists are summarised; narrow them with the \
tool filters. Assignment submission is disabled.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,

    /// Canvas client and cache shared with every tool.
    context: Arc<ToolContext>,

    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails when the Canvas base URL or token cannot be used to build a client.
    pub fn new(config: Config) -> CoreResult<Self> {
        let context = Arc::new(ToolContext::from_config(&config)?);
        info!(
            api_base = %context.client().api_base(),
            cache_enabled = context.cache().is_enabled(),
            "Canvas client ready"
        );

        Ok(Self {
            tool_router: build_tool_router::<Self>(context.clone()),
            config: Arc::new(config),
            context,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn context(&self) -> &Arc<ToolContext> {
        &self.context
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
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
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, rmcp::ErrorData> {
        ToolRegistry::new(self.context.clone())
            .call_tool(name, arguments)
            .await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::new("https://canvas.example.edu", "test-token")
    }

    #[test]
    fn test_server_exposes_all_tools() {
        let server = McpServer::new(test_config()).unwrap();
        assert_eq!(server.tool_count(), 13);
        assert_eq!(server.list_tools().len(), 13);
        assert_eq!(server.name(), "canvas-mcp-server");
    }

    #[test]
    fn test_server_info_enables_tools_only() {
        let server = McpServer::new(test_config()).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "canvas-mcp-server");
    }

    #[test]
    fn test_invalid_base_url_fails() {
        let config = Config::new("ftp://canvas.example.edu", "test-token");
        assert!(McpServer::new(config).is_err());
    }
}
