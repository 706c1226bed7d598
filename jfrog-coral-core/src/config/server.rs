use reqwest::Url;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// One MCP tool server the agent binds to at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub transport: ServerTransport,
    /// Upper bound for a single JSON-RPC round trip.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerTransport {
    /// Child process speaking newline-delimited JSON-RPC on stdin/stdout.
    Stdio {
        command: PathBuf,
        args: Vec<String>,
        env: HashMap<String, String>,
    },
    /// Legacy MCP HTTP+SSE transport.
    Sse { url: Url },
}

impl ServerTransport {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerTransport::Stdio { .. } => "stdio",
            ServerTransport::Sse { .. } => "sse",
        }
    }
}

impl ServerConfig {
    /// Builds a stdio server entry, expanding `~` and `${VAR}` in the command
    /// and its arguments.
    pub fn stdio(
        name: impl Into<String>,
        command: PathBuf,
        args: Vec<String>,
        env: HashMap<String, String>,
        timeout: Duration,
    ) -> Self {
        let command = PathBuf::from(expand(&command.to_string_lossy()));
        let args = args.iter().map(|arg| expand(arg)).collect();
        Self {
            name: name.into(),
            transport: ServerTransport::Stdio {
                command,
                args,
                env,
            },
            timeout,
        }
    }
}

fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
