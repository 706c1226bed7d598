use crate::application::client::ChatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
    #[error("agent exceeded the maximum of {max_steps} tool calls")]
    StepLimit { max_steps: usize },
}

impl AgentError {
    /// Summary sent back to the requesting agent when an instruction fails.
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Chat(err) => err.user_message(),
            AgentError::InvalidResponse(_) => {
                "The language model kept answering in an unreadable format, so the instruction was not completed."
                    .to_string()
            }
            AgentError::StepLimit { max_steps } => format!(
                "The instruction needed more than {max_steps} tool calls and was stopped before completion."
            ),
        }
    }
}
