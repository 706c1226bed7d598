//! Agent-side tools that run on the agent host rather than behind an MCP
//! server: building a Python project with `uv` and pushing or scanning its
//! artifacts with the JFrog CLI.

mod build;
mod runner;
mod scan;
mod upload;

pub use build::BuildProjectTool;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use scan::{JfrogScanTool, collect_artifacts};
pub use upload::{UploadToJfrogTool, upload_target};

use super::error::ToolInvokeError;
use super::interface::ServerToolInfo;
use super::registry::LOCAL_SERVER_NAME;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

/// Text result of a local tool, shaped like an MCP `tools/call` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        let text = text.into();
        error!(message = text.as_str(), "Local tool failed");
        Self {
            text,
            is_error: true,
        }
    }

    pub fn into_value(self) -> Value {
        json!({
            "content": [{"type": "text", "text": self.text}],
            "isError": self.is_error,
        })
    }
}

#[async_trait]
pub trait LocalTool: Send + Sync {
    fn info(&self) -> ServerToolInfo;

    async fn call(&self, runner: &dyn CommandRunner, arguments: Value) -> ToolOutcome;
}

/// The local tools exposed to the agent under the `local` pseudo-server.
pub struct LocalToolSet {
    tools: Vec<Box<dyn LocalTool>>,
    runner: Arc<dyn CommandRunner>,
}

impl Default for LocalToolSet {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            runner: Arc::new(SystemRunner),
        }
    }
}

impl LocalToolSet {
    /// build_project, upload_to_jfrog and jfrog_scan_project backed by real processes.
    pub fn standard() -> Self {
        Self::default()
            .with_tool(BuildProjectTool)
            .with_tool(UploadToJfrogTool)
            .with_tool(JfrogScanTool)
    }

    pub fn with_tool(mut self, tool: impl LocalTool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn infos(&self) -> Vec<ServerToolInfo> {
        self.tools.iter().map(|tool| tool.info()).collect()
    }

    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, ToolInvokeError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.info().name == name)
            .ok_or_else(|| ToolInvokeError::Rpc {
                server: LOCAL_SERVER_NAME.to_string(),
                code: -32602,
                message: format!("Unknown tool: {name}"),
            })?;
        debug!(tool = name, "Running local tool");
        Ok(tool.call(self.runner.as_ref(), arguments).await.into_value())
    }
}

pub(crate) fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolOutcome> {
    serde_json::from_value(arguments)
        .map_err(|err| ToolOutcome::failed(format!("Invalid arguments for {tool}: {err}")))
}

/// Regular files directly inside `dir`, sorted by name.
pub(crate) fn list_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
