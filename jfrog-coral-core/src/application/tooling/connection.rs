//! JSON-RPC session with one MCP server, independent of transport.
//!
//! A transport owns the wire: it hands outbound frames to an [`OutboundSink`]
//! and feeds every inbound frame to [`McpConnection::handle_inbound`] from its
//! own reader task. Responses are matched to callers through the pending table.

use super::error::ToolInvokeError;
use super::interface::ServerToolInfo;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, oneshot};
use tracing::{debug, info, warn};

pub(crate) const PROTOCOL_VERSION: &str = "2025-06-18";

type Responder = oneshot::Sender<Result<Value, ToolInvokeError>>;

#[async_trait]
pub(crate) trait OutboundSink: Send + Sync {
    async fn send(&self, server: &str, message: &Value) -> Result<(), ToolInvokeError>;

    async fn close(&self);
}

#[derive(Clone)]
pub struct McpConnection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    server: String,
    timeout: Duration,
    sink: Box<dyn OutboundSink>,
    pending: AsyncMutex<HashMap<String, Responder>>,
    id_counter: AtomicU64,
    instructions: AsyncMutex<Option<String>>,
    tools: AsyncMutex<Vec<ServerToolInfo>>,
    closed: AtomicBool,
}

impl McpConnection {
    pub(crate) fn new(server: impl Into<String>, timeout: Duration, sink: Box<dyn OutboundSink>) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                server: server.into(),
                timeout,
                sink,
                pending: AsyncMutex::new(HashMap::new()),
                id_counter: AtomicU64::new(1),
                instructions: AsyncMutex::new(None),
                tools: AsyncMutex::new(Vec::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn server(&self) -> &str {
        &self.inner.server
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// `initialize` handshake, `notifications/initialized`, then `tools/list`.
    pub async fn initialize(&self) -> Result<(), ToolInvokeError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "title": "JFrog Coral Agent"
            },
            "capabilities": {}
        });
        let init_result = self.inner.send_request("initialize", params).await?;
        if let Some(version) = init_result.get("protocolVersion").and_then(Value::as_str) {
            debug!(server = %self.inner.server, version, "Negotiated MCP protocol version");
        }
        if let Some(text) = init_result.get("instructions").and_then(Value::as_str) {
            *self.inner.instructions.lock().await = Some(text.to_string());
        }
        self.inner
            .send_notification("notifications/initialized", json!({}))
            .await?;
        self.inner.refresh_tools().await?;
        Ok(())
    }

    pub async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ToolInvokeError> {
        if self.is_closed() {
            return Err(ToolInvokeError::Terminated {
                server: self.inner.server.clone(),
            });
        }
        let params = json!({
            "name": tool,
            "arguments": match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            }
        });
        self.inner.send_request("tools/call", params).await
    }

    pub async fn tools(&self) -> Vec<ServerToolInfo> {
        self.inner.tools.lock().await.clone()
    }

    pub async fn instructions(&self) -> Option<String> {
        self.inner.instructions.lock().await.clone()
    }

    pub(crate) async fn handle_inbound(&self, value: Value) {
        if let Err(err) = self.inner.process_inbound_message(value).await {
            warn!(server = %self.inner.server, %err, "failed to process message from MCP server");
        }
    }

    /// Called by the transport once its stream has ended.
    pub(crate) async fn mark_closed(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            info!(server = %self.inner.server, "MCP server connection closed");
        }
        self.inner.fail_all_pending().await;
    }

    pub async fn close(&self) {
        self.inner.sink.close().await;
        self.mark_closed().await;
    }
}

impl ConnectionInner {
    async fn process_inbound_message(self: &Arc<Self>, value: Value) -> Result<(), ToolInvokeError> {
        if let Some(id) = value.get("id").cloned() {
            if value.get("method").is_some() {
                self.handle_server_request(id, value).await
            } else {
                self.handle_response(id, value).await;
                Ok(())
            }
        } else if value.get("method").is_some() {
            self.handle_notification(value);
            Ok(())
        } else {
            Ok(())
        }
    }

    async fn handle_response(&self, id: Value, value: Value) {
        let Some(key) = response_key(&id) else {
            return;
        };

        let responder = self.pending.lock().await.remove(&key);
        let Some(sender) = responder else {
            debug!(server = %self.server, response_id = key, "received response for unknown request");
            return;
        };

        let outcome = match value.get("error") {
            Some(error) => {
                let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32000);
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                Err(ToolInvokeError::Rpc {
                    server: self.server.clone(),
                    code,
                    message,
                })
            }
            None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
        };
        let _ = sender.send(outcome);
    }

    async fn handle_server_request(&self, id: Value, value: Value) -> Result<(), ToolInvokeError> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        match method {
            "ping" => self.send_response(id, json!({})).await,
            other => {
                warn!(server = %self.server, method = other, "server sent unsupported request");
                let error = json!({
                    "code": -32601,
                    "message": format!("client does not implement method '{other}'"),
                });
                self.send_error(id, error).await
            }
        }
    }

    fn handle_notification(self: &Arc<Self>, value: Value) {
        let Some(method) = value.get("method").and_then(Value::as_str) else {
            return;
        };
        debug!(server = %self.server, method, "received notification from server");
        if method == "notifications/tools/list_changed" {
            // The refresh response arrives on the reader task that delivered
            // this notification, so it cannot be awaited inline.
            let inner = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(err) = inner.refresh_tools().await {
                    warn!(server = %inner.server, %err, "failed to refresh tool catalogue");
                }
            });
        }
    }

    async fn refresh_tools(&self) -> Result<(), ToolInvokeError> {
        let result = self.send_request("tools/list", json!({})).await?;
        let tools: Vec<ServerToolInfo> = result
            .get("tools")
            .and_then(Value::as_array)
            .map(|array| array.iter().filter_map(ServerToolInfo::from_listing).collect())
            .unwrap_or_default();
        debug!(server = %self.server, count = tools.len(), "Tool catalogue refreshed");
        *self.tools.lock().await = tools;
        Ok(())
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, ToolInvokeError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ToolInvokeError::Terminated {
                server: self.server.clone(),
            });
        }
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });
        if let Err(err) = self.sink.send(&self.server, &payload).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(ToolInvokeError::Cancelled {
                server: self.server.clone(),
            }),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(ToolInvokeError::Timeout {
                    server: self.server.clone(),
                    method: method.to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn send_notification(&self, method: &str, params: Value) -> Result<(), ToolInvokeError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        });
        self.sink.send(&self.server, &payload).await
    }

    async fn send_response(&self, id: Value, result: Value) -> Result<(), ToolInvokeError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": result
        });
        self.sink.send(&self.server, &payload).await
    }

    async fn send_error(&self, id: Value, error: Value) -> Result<(), ToolInvokeError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": error
        });
        self.sink.send(&self.server, &payload).await
    }

    async fn fail_all_pending(&self) {
        let mut pending = self.pending.lock().await;
        for (_, sender) in pending.drain() {
            let _ = sender.send(Err(ToolInvokeError::Terminated {
                server: self.server.clone(),
            }));
        }
    }

    fn next_id(&self) -> String {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        format!("req-{id}")
    }
}

fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}
