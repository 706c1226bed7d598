use crate::application::agent::{AgentDirective, AgentError};
use serde_json::{Map, Value};

/// Reads the model's reply as a directive. Accepts bare JSON, JSON inside a
/// code fence, or the outermost `{...}` span of a chattier reply.
pub fn parse_directive(content: &str) -> Result<AgentDirective, AgentError> {
    match extract_json(content) {
        Some(Value::Object(map)) => directive_from_object(&map),
        // some models double-encode the object as a JSON string
        Some(Value::String(text)) if text.trim() != content.trim() => parse_directive(&text),
        Some(other) => Err(AgentError::InvalidResponse(format!(
            "unsupported response type: {other}"
        ))),
        None => Err(AgentError::InvalidResponse(
            "expected JSON object in agent response".into(),
        )),
    }
}

fn directive_from_object(map: &Map<String, Value>) -> Result<AgentDirective, AgentError> {
    let field = |name: &str, action: &str| {
        map.get(name).and_then(Value::as_str).ok_or_else(|| {
            AgentError::InvalidResponse(format!("{action} action missing {name} field"))
        })
    };

    match map.get("action").and_then(Value::as_str) {
        Some("call_tool") => Ok(AgentDirective::CallTool {
            tool: field("tool", "call_tool")?.to_string(),
            input: map.get("input").cloned().unwrap_or(Value::Null),
        }),
        Some("final") => Ok(AgentDirective::Final {
            response: field("response", "final")?.to_string(),
        }),
        Some(other) => Err(AgentError::InvalidResponse(format!(
            "unknown action value: {other}"
        ))),
        None => Err(AgentError::InvalidResponse(
            "missing action field in agent response".into(),
        )),
    }
}

fn extract_json(content: &str) -> Option<Value> {
    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest
            .trim_start_matches("json")
            .trim_start_matches("JSON");
        if let Some(end) = body.rfind("```") {
            if let Ok(value) = serde_json::from_str::<Value>(body[..end].trim()) {
                return Some(value);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start < end {
        serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
    } else {
        None
    }
}
