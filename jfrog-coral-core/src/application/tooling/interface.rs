use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::error::ToolInvokeError;

/// A tool as advertised by an MCP server's `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerToolInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ServerToolInfo {
    pub fn from_listing(tool: &Value) -> Option<Self> {
        let name = tool.get("name").and_then(Value::as_str)?;
        Some(Self {
            name: name.to_string(),
            description: tool
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            input_schema: tool.get("inputSchema").cloned(),
        })
    }
}

#[async_trait]
pub trait ToolServerInterface: Send + Sync {
    async fn invoke_tool(
        &self,
        server: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolInvokeError>;

    /// Current listing; for MCP servers this follows `list_changed` refreshes.
    async fn list_tools(&self, server: &str) -> Result<Vec<ServerToolInfo>, ToolInvokeError>;

    async fn server_instructions(&self, server: &str) -> Option<String>;
}
