mod context;
mod execution;
mod instructions;
mod parser;

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::tooling::{ToolBinding, ToolServerInterface};

pub use execution::ToolExecution;
pub(crate) use instructions::{JSON_RETRY_MESSAGE, tool_result_prompt};
pub use parser::parse_directive;

/// The agent's view of the tool catalogue plus the bridge that executes calls.
pub struct ToolRuntime {
    tools: Vec<ToolBinding>,
    index: HashMap<String, usize>,
    bridge: Arc<dyn ToolServerInterface>,
}

impl ToolRuntime {
    pub fn new(tools: Vec<ToolBinding>, bridge: Arc<dyn ToolServerInterface>) -> Self {
        let index = tools
            .iter()
            .enumerate()
            .map(|(position, tool)| (tool.name.to_lowercase(), position))
            .collect();

        Self {
            tools,
            index,
            bridge,
        }
    }

    fn lookup(&self, name: &str) -> Option<&ToolBinding> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|position| self.tools.get(*position))
    }
}
