use super::ToolRuntime;
use crate::application::agent::ToolContext;
use serde_json::{Value, json};

pub(crate) const JSON_RETRY_MESSAGE: &str = "Your previous reply was not valid JSON for the agent protocol. \
Reply again with exactly one JSON object: either {\"action\":\"call_tool\",\"tool\":\"...\",\"input\":{...}} \
or {\"action\":\"final\",\"response\":\"...\"}. No commentary and no code fences.";

pub(crate) const TOOL_RESULT_INSTRUCTION: &str = "Use this tool result to continue. Call another tool only if the \
instruction still needs it; otherwise reply with the final JSON answer. If the tool failed (for example \
permission denied or not found), do not retry it; explain the failure in the final response.";

impl ToolRuntime {
    pub fn compose_system_instructions(&self, context: &ToolContext) -> String {
        let mut lines = vec![
            "You are an MCP-JFrog agent. Other agents send you instructions about JFrog Artifactory management \
(repositories, artifacts, builds, vulnerability scans, permissions, AQL queries) and you carry them out with your JFrog tools."
                .to_string(),
            "Read the instruction, check the tool schemas, plan the steps and call only the tools each step needs."
                .to_string(),
            "All responses must be valid JSON without commentary or code fences.".to_string(),
            "To invoke a tool, respond with: {\"action\":\"call_tool\",\"tool\":\"tool_name\",\"input\":{...}}."
                .to_string(),
            "To list the available tools, call the special tool: {\"action\":\"call_tool\",\"tool\":\"list_tools\"}."
                .to_string(),
            "When the instruction is done, or cannot be done, respond with: {\"action\":\"final\",\"response\":\"...\"} \
summarising what was executed and any errors."
                .to_string(),
        ];

        if context.is_empty() {
            lines.push("No tools are currently available.".to_string());
            return lines.join("\n");
        }

        for guidance in &context.servers {
            lines.push(format!(
                "Server '{}' guidance: {}",
                guidance.name, guidance.instruction
            ));
        }

        lines.push("Available tools:".to_string());
        for descriptor in &context.tools {
            let mut line = format!("Tool: {}", descriptor.name);
            if let Some(description) = &descriptor.description {
                line.push_str(&format!(", Description: {}", description.trim()));
            }
            if let Some(schema) = &descriptor.input_schema {
                line.push_str(&format!(
                    ", Schema: {}",
                    serde_json::to_string(schema).unwrap_or_default()
                ));
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    pub fn initial_user_prompt(&self, prompt: &str) -> String {
        json!({
            "action": "user_request",
            "prompt": prompt,
        })
        .to_string()
    }
}

pub(crate) fn tool_result_prompt(execution: &super::ToolExecution) -> String {
    let result: Value = json!({
        "tool": execution.tool,
        "input": execution.input,
        "success": execution.success,
        "output": execution.output,
        "message": execution.message,
    });
    json!({
        "tool_result": result,
        "instruction": TOOL_RESULT_INSTRUCTION,
    })
    .to_string()
}
