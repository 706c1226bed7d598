use super::ToolRuntime;
use crate::application::tooling::ToolInvokeError;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

/// Name of the built-in tool that returns the catalogue itself.
pub(crate) const LIST_TOOLS: &str = "list_tools";

#[derive(Debug, Clone)]
pub struct ToolExecution {
    pub tool: String,
    pub success: bool,
    pub input: Value,
    pub output: Value,
    pub message: Option<String>,
}

impl ToolExecution {
    fn failed(tool: impl Into<String>, input: Value, message: String) -> Self {
        Self {
            tool: tool.into(),
            success: false,
            input,
            output: json!({ "error": message }),
            message: Some(message),
        }
    }
}

impl ToolRuntime {
    /// Runs one tool call. Failures (unknown tool, transport errors, server
    /// rejections such as a JFrog 403) come back as an unsuccessful
    /// execution for the model to explain, never as an error.
    pub async fn execute(&self, tool_name: &str, input: Value) -> ToolExecution {
        if tool_name.eq_ignore_ascii_case(LIST_TOOLS) {
            let manifest = self.build_context().await;
            debug!("Agent requested tool catalogue via list_tools");
            return ToolExecution {
                tool: LIST_TOOLS.to_string(),
                success: true,
                input,
                output: serde_json::to_value(&manifest).unwrap_or(Value::Null),
                message: Some(format!("{} tools available.", manifest.tools.len())),
            };
        }

        let Some(tool) = self.lookup(tool_name) else {
            warn!(requested_tool = tool_name, "Unknown tool requested by agent");
            return ToolExecution::failed(
                tool_name,
                input,
                format!("Unknown tool '{tool_name}'. Call list_tools to see the available tools."),
            );
        };

        let arguments = match &input {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };

        debug!(tool = tool.name.as_str(), server = tool.server.as_str(), "Dispatching tool via MCP");
        match self
            .bridge
            .invoke_tool(&tool.server, &tool.name, arguments)
            .await
        {
            Ok(result) => {
                let is_error = result
                    .get("isError")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let execution = ToolExecution {
                    tool: tool.name.clone(),
                    success: !is_error,
                    input,
                    message: extract_tool_message(&result),
                    output: result,
                };
                info!(tool = execution.tool.as_str(), success = execution.success, "Tool executed");
                execution
            }
            Err(source) => {
                warn!(tool = tool.name.as_str(), server = tool.server.as_str(), %source, "Tool execution failed");
                ToolExecution::failed(tool.name.clone(), input, describe_failure(&source))
            }
        }
    }
}

fn describe_failure(error: &ToolInvokeError) -> String {
    match error {
        ToolInvokeError::Rpc { message, code, .. } => {
            format!("Tool call rejected by the server ({code}): {message}")
        }
        ToolInvokeError::Timeout { timeout, .. } => {
            format!("Tool call timed out after {} seconds", timeout.as_secs())
        }
        other => format!("Tool call failed: {other}"),
    }
}

/// First non-empty text block of an MCP result, falling back to a
/// structured error message.
pub(crate) fn extract_tool_message(result: &Value) -> Option<String> {
    let text = result
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|block| {
            block
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|kind| kind.eq_ignore_ascii_case("text"))
        })
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty());
    if let Some(text) = text {
        return Some(text.to_string());
    }

    result
        .pointer("/structuredContent/error/message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
