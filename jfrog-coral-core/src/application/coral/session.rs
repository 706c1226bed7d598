use super::mention::{mention_text, parse_mentions};
use super::{SEND_MESSAGE, WAIT_FOR_MENTIONS};
use crate::application::agent::{Agent, AgentOptions};
use crate::application::tooling::{ToolInvokeError, ToolServerInterface};
use crate::config::defaults::MENTION_WAIT;
use crate::model::ModelProvider;
use crate::types::Mention;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Tool(#[from] ToolInvokeError),
    #[error("coral tool '{tool}' reported an error: {message}")]
    Rejected { tool: String, message: String },
}

impl SessionError {
    /// The Coral server is gone; the session cannot continue.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SessionError::Tool(err) if err.is_connectivity())
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub server: String,
    pub wait_timeout_ms: u64,
    pub idle_delay: Duration,
    pub error_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            server: crate::config::defaults::CORAL_SERVER_NAME.to_string(),
            wait_timeout_ms: MENTION_WAIT.as_millis() as u64,
            idle_delay: Duration::from_secs(1),
            error_delay: Duration::from_secs(5),
        }
    }
}

pub struct CoralSession<P: ModelProvider> {
    bridge: Arc<dyn ToolServerInterface>,
    agent: Agent<P>,
    options: SessionOptions,
}

impl<P: ModelProvider> CoralSession<P> {
    pub fn new(bridge: Arc<dyn ToolServerInterface>, agent: Agent<P>) -> Self {
        Self {
            bridge,
            agent,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Serves mentions until `shutdown` resolves or the Coral connection drops.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<(), SessionError> {
        tokio::pin!(shutdown);
        info!(server = self.options.server.as_str(), "Waiting for mentions");
        loop {
            let delay = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                polled = self.poll_once() => match polled {
                    Ok(_) => self.options.idle_delay,
                    Err(err) if err.is_disconnect() => {
                        error!(%err, "Coral connection lost");
                        return Err(err);
                    }
                    Err(err) => {
                        warn!(%err, "Mention iteration failed");
                        self.options.error_delay
                    }
                },
            };
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        info!("Coral session stopped");
        Ok(())
    }

    /// One wait/answer cycle. Returns the number of mentions answered.
    pub async fn poll_once(&self) -> Result<usize, SessionError> {
        let result = self
            .call_coral(
                WAIT_FOR_MENTIONS,
                json!({ "timeoutMs": self.options.wait_timeout_ms }),
            )
            .await?;
        let mentions = parse_mentions(&result);
        if mentions.is_empty() {
            return Ok(0);
        }

        info!(count = mentions.len(), "Received mentions");
        // Coral has already handed the whole batch over, so one failed reply
        // must not strand the mentions after it.
        let mut first_failure = None;
        for mention in &mentions {
            let answer = self.answer(mention).await;
            let sent = self
                .call_coral(
                    SEND_MESSAGE,
                    json!({
                        "threadId": mention.thread_id,
                        "content": answer,
                        "mentions": [mention.sender_id],
                    }),
                )
                .await;
            match sent {
                Ok(_) => info!(
                    thread = mention.thread_id.as_str(),
                    sender = mention.sender_id.as_str(),
                    "Replied to mention"
                ),
                Err(err) => {
                    error!(
                        thread = mention.thread_id.as_str(),
                        %err,
                        "Failed to send reply"
                    );
                    let disconnected = err.is_disconnect();
                    first_failure.get_or_insert(err);
                    if disconnected {
                        break;
                    }
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(mentions.len()),
        }
    }

    async fn answer(&self, mention: &Mention) -> String {
        info!(
            thread = mention.thread_id.as_str(),
            sender = mention.sender_id.as_str(),
            "Processing instruction"
        );
        if mention.content.trim().is_empty() {
            return "error: the mention carried no instruction".to_string();
        }
        match self.agent.run(&mention.content, AgentOptions::default()).await {
            Ok(outcome) => {
                self.agent.finish(&outcome.session_id).await;
                outcome.response
            }
            Err(err) => {
                error!(%err, "Instruction failed");
                format!("error: {}", err.user_message())
            }
        }
    }

    async fn call_coral(&self, tool: &str, arguments: Value) -> Result<Value, SessionError> {
        let result = self
            .bridge
            .invoke_tool(&self.options.server, tool, arguments)
            .await?;
        if result.get("isError").and_then(Value::as_bool).unwrap_or(false) {
            return Err(SessionError::Rejected {
                tool: tool.to_string(),
                message: mention_text(&result),
            });
        }
        Ok(result)
    }
}
