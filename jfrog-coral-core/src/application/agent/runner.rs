use super::directive::AgentDirective;
use super::errors::AgentError;
use super::models::{AgentOptions, AgentOutcome, AgentStep};
use super::runtime::ToolRuntime;
use super::runtime::parse_directive;
use crate::application::client::{ChatClient, ChatRequest};
use crate::application::tooling::{ToolBinding, ToolServerInterface};
use crate::model::ModelProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum retry attempts for JSON parsing failures
const MAX_JSON_RETRIES: u8 = 3;

pub struct Agent<P: ModelProvider> {
    client: Arc<ChatClient<P>>,
    runtime: ToolRuntime,
}

impl<P: ModelProvider> Agent<P> {
    pub fn new(
        client: Arc<ChatClient<P>>,
        tools: Vec<ToolBinding>,
        bridge: Arc<dyn ToolServerInterface>,
    ) -> Self {
        Self {
            client,
            runtime: ToolRuntime::new(tools, bridge),
        }
    }

    /// Answers one instruction. Tool failures are reported to the model and
    /// end up in the response; only model failures or a runaway loop surface
    /// as errors.
    pub async fn run(
        &self,
        prompt: &str,
        options: AgentOptions,
    ) -> Result<AgentOutcome, AgentError> {
        let mut session_id = options.session_id.clone();
        let result = self.drive(prompt, options, &mut session_id).await;
        if result.is_err() {
            if let Some(id) = session_id.as_deref() {
                self.finish(id).await;
            }
        }
        result
    }

    async fn drive(
        &self,
        prompt: &str,
        options: AgentOptions,
        session_id: &mut Option<String>,
    ) -> Result<AgentOutcome, AgentError> {
        info!(
            prompt = ChatClient::<P>::summarise(prompt).as_str(),
            "Agent run started"
        );
        let context = self.runtime.build_context().await;
        let instructions = self.runtime.compose_system_instructions(&context);
        let system_prompt = match options.system_prompt {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{existing}\n\n{instructions}")
            }
            _ => instructions,
        };

        let mut steps = Vec::new();
        let mut next_prompt = self.runtime.initial_user_prompt(prompt);
        let mut system_prompt = Some(system_prompt);
        let mut remaining_steps = options.max_steps;

        loop {
            debug!(
                session = session_id.as_deref(),
                remaining_steps, "Submitting agent turn to model provider"
            );
            let result = self
                .client
                .chat(ChatRequest {
                    prompt: next_prompt,
                    system_prompt: system_prompt.take(),
                    session_id: session_id.clone(),
                })
                .await?;
            *session_id = Some(result.session_id.clone());

            let directive = self
                .parse_with_retry(result.content, &result.session_id)
                .await?;

            match directive {
                AgentDirective::Final { response } => {
                    info!(
                        session_id = result.session_id.as_str(),
                        steps = steps.len(),
                        "Agent returned final response"
                    );
                    return Ok(AgentOutcome {
                        session_id: result.session_id,
                        response,
                        steps,
                    });
                }
                AgentDirective::CallTool { tool, input } => {
                    if remaining_steps == 0 {
                        warn!(max_steps = options.max_steps, "Agent exceeded max tool interactions");
                        return Err(AgentError::StepLimit {
                            max_steps: options.max_steps,
                        });
                    }
                    remaining_steps -= 1;
                    info!(tool = tool.as_str(), "Agent requested tool execution");
                    let execution = self.runtime.execute(&tool, input).await;
                    next_prompt = super::runtime::tool_result_prompt(&execution);
                    steps.push(AgentStep {
                        tool: execution.tool,
                        input: execution.input,
                        success: execution.success,
                        output: execution.output,
                        message: execution.message,
                    });
                }
            }
        }
    }

    /// Ends the model-side history for a finished instruction.
    pub async fn finish(&self, session_id: &str) {
        self.client.forget(session_id).await;
    }

    async fn parse_with_retry(
        &self,
        content: String,
        session_id: &str,
    ) -> Result<AgentDirective, AgentError> {
        let mut retry_count = 0u8;
        let mut current_content = content;

        loop {
            match parse_directive(&current_content) {
                Ok(directive) => return Ok(directive),
                Err(e) if retry_count < MAX_JSON_RETRIES => {
                    retry_count += 1;
                    warn!(
                        attempt = retry_count,
                        max_attempts = MAX_JSON_RETRIES,
                        error = %e,
                        "JSON parse failed, requesting correction from model"
                    );

                    let retry = self
                        .client
                        .chat(ChatRequest {
                            prompt: format!(
                                "{}\n\nError details: {e}",
                                super::runtime::JSON_RETRY_MESSAGE
                            ),
                            system_prompt: None,
                            session_id: Some(session_id.to_string()),
                        })
                        .await?;
                    current_content = retry.content;
                }
                Err(e) => {
                    warn!(attempts = retry_count, "JSON parse failed after max retries");
                    return Err(AgentError::InvalidResponse(format!(
                        "invalid JSON after {MAX_JSON_RETRIES} retry attempts: {e}"
                    )));
                }
            }
        }
    }
}
