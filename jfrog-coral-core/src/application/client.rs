use crate::config::ModelSettings;
use crate::model::{ModelError, ModelProvider, ModelRequest};
use crate::types::ChatMessage;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ChatRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatResult {
    pub content: String,
    pub session_id: String,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ChatError {
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Model(err) => err.user_message(),
        }
    }
}

/// Sampling parameters applied to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParameters {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&ModelSettings> for ChatParameters {
    fn from(settings: &ModelSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Conversation front-end for the configured model. Keeps the message history
/// of each session so an agent run can span several model turns.
pub struct ChatClient<P: ModelProvider> {
    provider: P,
    parameters: ChatParameters,
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl<P: ModelProvider> ChatClient<P> {
    pub fn new(provider: P, parameters: ChatParameters) -> Self {
        Self {
            provider,
            parameters,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResult, ChatError> {
        let session_id = request.session_id.unwrap_or_else(new_session_id);

        let history = {
            let mut sessions = self.sessions.lock().await;
            sessions.entry(session_id.clone()).or_default().clone()
        };
        debug!(
            session_id = session_id.as_str(),
            history_count = history.len(),
            "Preparing chat request with prior history"
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system) = request.system_prompt.as_deref().map(str::trim) {
            if !system.is_empty() {
                messages.push(ChatMessage::system(system));
            }
        }
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(request.prompt.clone()));

        info!(
            session_id = session_id.as_str(),
            provider = self.provider.id(),
            model = self.parameters.model.as_str(),
            prompt = Self::summarise(&request.prompt).as_str(),
            "Sending request to model provider"
        );

        let response = self
            .provider
            .chat(ModelRequest {
                model: self.parameters.model.clone(),
                messages,
                temperature: self.parameters.temperature,
                max_tokens: self.parameters.max_tokens,
                session_id: Some(session_id.clone()),
            })
            .await?;

        let final_session = response
            .session_id
            .clone()
            .unwrap_or_else(|| session_id.clone());
        debug!(
            session_id = final_session.as_str(),
            response = Self::summarise(&response.message.content).as_str(),
            "Response received from model provider"
        );

        let content = response.message.content.clone();
        self.persist_exchange(&final_session, request.system_prompt, request.prompt, response.message)
            .await;

        Ok(ChatResult {
            content,
            session_id: final_session,
        })
    }

    /// Drops the history of a finished session.
    pub async fn forget(&self, session_id: &str) {
        self.sessions.lock().await.remove(session_id);
    }

    async fn persist_exchange(
        &self,
        session_id: &str,
        system_prompt: Option<String>,
        user_prompt: String,
        assistant: ChatMessage,
    ) {
        let mut sessions = self.sessions.lock().await;
        let history = sessions.entry(session_id.to_string()).or_default();
        // the system prompt is sent once per session, so it is kept at the head of the history
        if let Some(system) = system_prompt.filter(|text| !text.trim().is_empty()) {
            if history.is_empty() {
                history.push(ChatMessage::system(system.trim()));
            }
        }
        history.push(ChatMessage::user(user_prompt));
        history.push(assistant);
        debug!(
            session_id,
            total_messages = history.len(),
            "Persisted chat exchange to session history"
        );
    }

    pub(crate) fn summarise(text: &str) -> String {
        const SNIPPET_LIMIT: usize = 160;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return "(empty)".to_string();
        }
        let single_line = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut result: String = single_line.chars().take(SNIPPET_LIMIT).collect();
        if single_line.chars().count() > SNIPPET_LIMIT {
            result.push('…');
        }
        result
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}
