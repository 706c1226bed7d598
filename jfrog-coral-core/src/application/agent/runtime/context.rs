use std::collections::HashSet;

use super::ToolRuntime;
use crate::application::agent::{ServerGuidance, ToolContext, ToolDescriptor};

impl ToolRuntime {
    pub async fn build_context(&self) -> ToolContext {
        let mut context = ToolContext::default();
        let mut seen_servers = HashSet::new();

        for tool in &self.tools {
            if seen_servers.insert(tool.server.as_str()) {
                if let Some(instruction) = self.bridge.server_instructions(&tool.server).await {
                    let instruction = instruction.trim();
                    if !instruction.is_empty() {
                        context.servers.push(ServerGuidance {
                            name: tool.server.clone(),
                            instruction: instruction.to_string(),
                        });
                    }
                }
            }

            context.tools.push(ToolDescriptor {
                name: tool.name.clone(),
                description: tool.description.clone(),
                server: tool.server.clone(),
                input_schema: tool.input_schema.clone(),
            });
        }

        context
    }
}
