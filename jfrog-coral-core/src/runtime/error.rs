use crate::application::coral::SessionError;
use crate::application::tooling::ToolInvokeError;
use crate::config::ConfigError;
use thiserror::Error;

/// Anything that stops the agent before or while serving Coral.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("tool server error: {0}")]
    Tools(#[from] ToolInvokeError),
    #[error("coral session ended: {0}")]
    Session(#[from] SessionError),
}
