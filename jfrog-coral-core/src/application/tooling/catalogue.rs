use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolServerInterface};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// A discovered tool together with the server that executes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolBinding {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolBinding {
    pub fn from_info(server: &str, info: ServerToolInfo) -> Self {
        Self {
            name: info.name,
            description: info.description,
            server: server.to_string(),
            input_schema: info.input_schema,
        }
    }
}

/// A tool left out of the agent's tool set, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTool {
    pub name: String,
    pub server: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ToolCatalogue {
    pub tools: Vec<ToolBinding>,
    pub rejected: Vec<RejectedTool>,
}

impl ToolCatalogue {
    /// Collects the tools of `servers`, dropping any whose input schema uses
    /// `$ref` (the agent inlines schemas into its prompt and cannot resolve
    /// references).
    pub async fn discover(
        bridge: &dyn ToolServerInterface,
        servers: &[&str],
    ) -> Result<Self, ToolInvokeError> {
        let mut catalogue = ToolCatalogue::default();
        for server in servers {
            let listed = bridge.list_tools(server).await?;
            info!(server, count = listed.len(), "Discovered tools");
            for info in listed {
                catalogue.admit(ToolBinding::from_info(server, info));
            }
        }

        if !catalogue.rejected.is_empty() {
            warn!(count = catalogue.rejected.len(), "Found problematic tools");
            for rejected in &catalogue.rejected {
                warn!(
                    tool = rejected.name.as_str(),
                    server = rejected.server.as_str(),
                    reason = rejected.reason.as_str(),
                    "Excluding tool"
                );
            }
        }
        info!(
            usable = catalogue.tools.len(),
            total = catalogue.tools.len() + catalogue.rejected.len(),
            "Tool catalogue ready"
        );
        Ok(catalogue)
    }

    pub fn admit(&mut self, binding: ToolBinding) {
        let refs = binding
            .input_schema
            .as_ref()
            .map(find_refs)
            .unwrap_or_default();
        if refs.is_empty() {
            self.tools.push(binding);
        } else {
            self.rejected.push(RejectedTool {
                reason: format!("schema references {}", refs.join(", ")),
                name: binding.name,
                server: binding.server,
            });
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Every `$ref` target found anywhere inside `schema`.
pub fn find_refs(schema: &Value) -> Vec<String> {
    let mut refs = Vec::new();
    collect_refs(schema, &mut refs);
    refs
}

fn collect_refs(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(target) = map.get("$ref") {
                refs.push(
                    target
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| target.to_string()),
                );
            }
            for nested in map.values() {
                collect_refs(nested, refs);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, refs);
            }
        }
        _ => {}
    }
}
