use crate::availability::Availability;
use crate::tools::{self, AskArgs};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use std::sync::Arc;

/// Name advertised to MCP hosts during initialization
const IMPLEMENTATION_NAME: &str = "gemini";

const INSTRUCTIONS: &str = "Gemini AI collaboration server. Use `ask` to get a second opinion \
from Gemini (optionally with context and a persona) and `status` to check whether the backend \
is configured.";

/// MCP server exposing the `ask` and `status` tools
#[derive(Clone)]
pub struct GeminiServer {
    availability: Arc<Availability>,
    tool_router: ToolRouter<GeminiServer>,
}

#[tool_router]
impl GeminiServer {
    pub fn new(availability: Availability) -> Self {
        Self {
            availability: Arc::new(availability),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Ask Gemini a question and get the response directly in context")]
    async fn ask(&self, Parameters(args): Parameters<AskArgs>) -> Result<CallToolResult, McpError> {
        let text = tools::ask(&self.availability, args).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get server status and error information")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        let text = tools::status(&self.availability);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for GeminiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: IMPLEMENTATION_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
