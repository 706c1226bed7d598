//! stdio transport: the MCP server runs as a child process and exchanges
//! newline-delimited JSON-RPC frames over its stdin/stdout.

use super::connection::{McpConnection, OutboundSink};
use super::error::ToolInvokeError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

struct StdioSink {
    writer: AsyncMutex<Option<BufWriter<ChildStdin>>>,
    child: AsyncMutex<Option<Child>>,
}

#[async_trait]
impl OutboundSink for StdioSink {
    async fn send(&self, server: &str, message: &Value) -> Result<(), ToolInvokeError> {
        let mut encoded =
            serde_json::to_string(message).map_err(|source| ToolInvokeError::InvalidJson {
                server: server.to_string(),
                source,
            })?;
        encoded.push('\n');

        let transport = |source: std::io::Error| ToolInvokeError::Transport {
            server: server.to_string(),
            message: source.to_string(),
        };

        let mut writer = self.writer.lock().await;
        let stream = writer.as_mut().ok_or_else(|| ToolInvokeError::Terminated {
            server: server.to_string(),
        })?;
        stream.write_all(encoded.as_bytes()).await.map_err(transport)?;
        stream.flush().await.map_err(transport)?;
        Ok(())
    }

    async fn close(&self) {
        self.writer.lock().await.take();
        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(err) = child.kill().await {
                debug!(%err, "failed to kill MCP server process (may have already exited)");
            }
            let _ = child.wait().await;
        }
    }
}

/// Spawns the server, starts its reader task and completes the MCP handshake.
pub(crate) async fn connect_stdio(
    name: &str,
    command: &Path,
    args: &[String],
    env: &HashMap<String, String>,
    timeout: Duration,
) -> Result<McpConnection, ToolInvokeError> {
    let mut cmd = Command::new(command);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    for (key, value) in env {
        cmd.env(key, value);
    }

    info!(server = name, command = %command.display(), "Spawning MCP server");
    let mut child = cmd.spawn().map_err(|source| ToolInvokeError::Spawn {
        server: name.to_string(),
        source,
    })?;

    let stdin = child.stdin.take().ok_or_else(|| ToolInvokeError::Transport {
        server: name.to_string(),
        message: "failed to capture server stdin".into(),
    })?;
    let stdout = child.stdout.take().ok_or_else(|| ToolInvokeError::Transport {
        server: name.to_string(),
        message: "failed to capture server stdout".into(),
    })?;

    let sink = StdioSink {
        writer: AsyncMutex::new(Some(BufWriter::new(stdin))),
        child: AsyncMutex::new(Some(child)),
    };
    let connection = McpConnection::new(name, timeout, Box::new(sink));

    let reader = connection.clone();
    tokio::spawn(async move {
        reader_loop(reader, stdout).await;
    });

    if let Err(err) = connection.initialize().await {
        connection.close().await;
        return Err(err);
    }
    Ok(connection)
}

async fn reader_loop(connection: McpConnection, stdout: ChildStdout) {
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(raw)) = lines.next_line().await {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        // npm and node-based servers occasionally print coloured log lines to stdout
        if !trimmed.starts_with('{') {
            debug!(
                server = connection.server(),
                line = trimmed,
                "skipping non-JSON line from MCP server"
            );
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => connection.handle_inbound(value).await,
            Err(source) => {
                warn!(
                    server = connection.server(),
                    line = trimmed,
                    %source,
                    "received invalid JSON from MCP server"
                );
            }
        }
    }

    connection.mark_closed().await;
}
