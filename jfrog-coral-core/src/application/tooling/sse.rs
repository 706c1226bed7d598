//! Legacy MCP HTTP+SSE transport, as served by Coral.
//!
//! The client opens a GET event stream. The first `endpoint` event names the
//! URL to POST JSON-RPC frames to; every reply then arrives on the stream as
//! a `message` event.

use super::connection::{McpConnection, OutboundSink};
use super::error::ToolInvokeError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Url};
use reqwest_eventsource::{Event, EventSource};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

struct SsePostSink {
    http: Client,
    endpoint: Url,
}

#[async_trait]
impl OutboundSink for SsePostSink {
    async fn send(&self, server: &str, message: &Value) -> Result<(), ToolInvokeError> {
        let transport = |source: reqwest::Error| ToolInvokeError::Transport {
            server: server.to_string(),
            message: source.to_string(),
        };
        self.http
            .post(self.endpoint.clone())
            .json(message)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        Ok(())
    }

    async fn close(&self) {}
}

/// Opens the event stream, waits for the POST endpoint and completes the MCP
/// handshake. Nothing is retried: any failure here is fatal for startup.
pub(crate) async fn connect_sse(
    name: &str,
    url: &Url,
    timeout: Duration,
) -> Result<McpConnection, ToolInvokeError> {
    let connect_error = |message: String| ToolInvokeError::Connect {
        server: name.to_string(),
        message,
    };

    let http = Client::new();
    let mut stream = EventSource::new(http.get(url.clone()))
        .map_err(|err| connect_error(err.to_string()))?;

    info!(server = name, host = url.host_str().unwrap_or_default(), "Opening SSE stream");
    let endpoint = match tokio::time::timeout(timeout, wait_for_endpoint(&mut stream, url)).await {
        Ok(Ok(endpoint)) => endpoint,
        Ok(Err(message)) => {
            stream.close();
            return Err(connect_error(message));
        }
        Err(_) => {
            stream.close();
            return Err(connect_error(format!(
                "no endpoint event received within {timeout:?}"
            )));
        }
    };
    debug!(server = name, endpoint = endpoint.path(), "Received MCP message endpoint");

    let connection = McpConnection::new(name, timeout, Box::new(SsePostSink { http, endpoint }));

    let reader = connection.clone();
    tokio::spawn(async move {
        event_loop(reader, stream).await;
    });

    if let Err(err) = connection.initialize().await {
        connection.close().await;
        return Err(err);
    }
    Ok(connection)
}

async fn wait_for_endpoint(stream: &mut EventSource, base: &Url) -> Result<Url, String> {
    while let Some(event) = stream.next().await {
        match event {
            Ok(Event::Open) => debug!("SSE stream opened"),
            Ok(Event::Message(message)) if message.event == "endpoint" => {
                return resolve_endpoint(base, &message.data);
            }
            Ok(Event::Message(message)) => {
                debug!(event = message.event.as_str(), "ignoring SSE event before endpoint");
            }
            Err(err) => return Err(err.to_string()),
        }
    }
    Err("event stream ended before an endpoint was announced".to_string())
}

/// The endpoint may be absolute or relative to the stream URL.
pub(crate) fn resolve_endpoint(base: &Url, data: &str) -> Result<Url, String> {
    let data = data.trim();
    if data.is_empty() {
        return Err("endpoint event carried no URL".to_string());
    }
    base.join(data)
        .map_err(|err| format!("invalid endpoint '{data}': {err}"))
}

async fn event_loop(connection: McpConnection, mut stream: EventSource) {
    while let Some(event) = stream.next().await {
        match event {
            Ok(Event::Open) => {}
            Ok(Event::Message(message)) if message.event == "message" => {
                match serde_json::from_str::<Value>(&message.data) {
                    Ok(value) => connection.handle_inbound(value).await,
                    Err(source) => warn!(
                        server = connection.server(),
                        %source,
                        "received invalid JSON on SSE stream"
                    ),
                }
            }
            Ok(Event::Message(message)) => {
                debug!(
                    server = connection.server(),
                    event = message.event.as_str(),
                    "ignoring SSE event"
                );
            }
            Err(reqwest_eventsource::Error::StreamEnded) => break,
            Err(err) => {
                warn!(server = connection.server(), %err, "SSE stream failed");
                break;
            }
        }
    }
    stream.close();
    connection.mark_closed().await;
}
