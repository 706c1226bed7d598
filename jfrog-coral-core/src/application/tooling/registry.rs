use super::connection::McpConnection;
use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolServerInterface};
use super::local::LocalToolSet;
use super::process::connect_stdio;
use super::sse::connect_sse;
use crate::config::{ServerConfig, ServerTransport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

/// Pseudo-server name under which agent-side tools are listed and invoked.
pub const LOCAL_SERVER_NAME: &str = "local";

/// Live sessions with every configured MCP server plus the local tools.
pub struct ToolRegistry {
    connections: HashMap<String, McpConnection>,
    local: LocalToolSet,
}

impl ToolRegistry {
    /// Connects to each server in order. The first failure aborts startup and
    /// tears down the sessions opened so far.
    pub async fn connect(servers: &[ServerConfig]) -> Result<Self, ToolInvokeError> {
        let mut connections: HashMap<String, McpConnection> = HashMap::new();
        for server in servers {
            info!(
                server = server.name.as_str(),
                transport = server.transport.kind(),
                "Connecting to MCP server"
            );
            let result = match &server.transport {
                ServerTransport::Stdio {
                    command,
                    args,
                    env,
                } => connect_stdio(&server.name, command, args, env, server.timeout).await,
                ServerTransport::Sse { url } => connect_sse(&server.name, url, server.timeout).await,
            };

            match result {
                Ok(connection) => {
                    info!(
                        server = server.name.as_str(),
                        tools = connection.tools().await.len(),
                        "MCP server connection established"
                    );
                    connections.insert(server.name.clone(), connection);
                }
                Err(err) => {
                    for connection in connections.values() {
                        connection.close().await;
                    }
                    return Err(err);
                }
            }
        }

        Ok(Self {
            connections,
            local: LocalToolSet::default(),
        })
    }

    pub fn with_local_tools(mut self, local: LocalToolSet) -> Self {
        self.local = local;
        self
    }

    pub fn is_connected(&self, server: &str) -> bool {
        self.connections
            .get(server)
            .map(|connection| !connection.is_closed())
            .unwrap_or(false)
    }

    pub async fn shutdown(&self) {
        for connection in self.connections.values() {
            connection.close().await;
        }
    }

    fn connection(&self, server: &str) -> Result<&McpConnection, ToolInvokeError> {
        self.connections
            .get(server)
            .ok_or_else(|| ToolInvokeError::NotConfigured {
                server: server.to_string(),
            })
    }
}

#[async_trait]
impl ToolServerInterface for ToolRegistry {
    async fn invoke_tool(
        &self,
        server: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolInvokeError> {
        if server == LOCAL_SERVER_NAME {
            return self.local.invoke(tool, arguments).await;
        }
        self.connection(server)?.call_tool(tool, arguments).await
    }

    async fn list_tools(&self, server: &str) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
        if server == LOCAL_SERVER_NAME {
            return Ok(self.local.infos());
        }
        Ok(self.connection(server)?.tools().await)
    }

    async fn server_instructions(&self, server: &str) -> Option<String> {
        match self.connection(server) {
            Ok(connection) => connection.instructions().await,
            Err(err) => {
                warn!(server, %err, "Failed to fetch server instructions");
                None
            }
        }
    }
}
