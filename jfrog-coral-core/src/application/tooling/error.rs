use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("MCP server '{server}' is not configured")]
    NotConfigured { server: String },
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to connect to MCP server '{server}': {message}")]
    Connect { server: String, message: String },
    #[error("MCP server '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP server '{server}' returned invalid JSON: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP server '{server}' did not answer '{method}' within {timeout:?}")]
    Timeout {
        server: String,
        method: String,
        timeout: Duration,
    },
    #[error("MCP server '{server}' terminated unexpectedly")]
    Terminated { server: String },
    #[error("MCP server '{server}' request cancelled")]
    Cancelled { server: String },
}

impl ToolInvokeError {
    pub fn server(&self) -> &str {
        match self {
            ToolInvokeError::NotConfigured { server }
            | ToolInvokeError::Spawn { server, .. }
            | ToolInvokeError::Connect { server, .. }
            | ToolInvokeError::Transport { server, .. }
            | ToolInvokeError::InvalidJson { server, .. }
            | ToolInvokeError::Rpc { server, .. }
            | ToolInvokeError::Timeout { server, .. }
            | ToolInvokeError::Terminated { server }
            | ToolInvokeError::Cancelled { server } => server,
        }
    }

    /// True when the server can no longer be reached at all, as opposed to a
    /// single request failing.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ToolInvokeError::Spawn { .. }
                | ToolInvokeError::Connect { .. }
                | ToolInvokeError::Terminated { .. }
        )
    }
}
