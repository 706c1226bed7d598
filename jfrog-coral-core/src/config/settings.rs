//! # Agent Settings
//!
//! The immutable configuration record assembled by the loader. It is built
//! once before any connection is attempted and shared read-only afterwards.
//!
//! ## Provider Types
//!
//! | `MODEL_PROVIDER` | Wire format | Default endpoint |
//! |------------------|-------------|------------------|
//! | `openai` | OpenAI chat completions | api.openai.com |
//! | `groq`, `mistral`, `anthropic`, `openrouter`, `together`, `deepseek` | OpenAI-compatible | vendor endpoint |
//! | `gemini`, `google`, `google_genai` | Gemini generateContent | generativelanguage.googleapis.com |
//! | `ollama` | Ollama `/api/chat` | 127.0.0.1:11434 |

use super::defaults::*;
use super::mode::RuntimeMode;
use super::server::{ServerConfig, ServerTransport};
use reqwest::Url;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// API dialect spoken by the configured model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAiCompatible,
    Gemini,
    Ollama,
}

impl ProviderKind {
    pub fn detect(provider: &str) -> Self {
        match provider.to_ascii_lowercase().as_str() {
            "ollama" | "localai" => ProviderKind::Ollama,
            "gemini" | "google" | "google_genai" | "google-genai" | "google-ai" => {
                ProviderKind::Gemini
            }
            _ => ProviderKind::OpenAiCompatible,
        }
    }

    /// Endpoint used when `MODEL_BASE_URL` is not set.
    pub fn default_endpoint(self, provider: &str) -> &'static str {
        match self {
            ProviderKind::Ollama => DEFAULT_OLLAMA_ENDPOINT,
            ProviderKind::Gemini => DEFAULT_GEMINI_ENDPOINT,
            ProviderKind::OpenAiCompatible => match provider.to_ascii_lowercase().as_str() {
                "groq" => DEFAULT_GROQ_ENDPOINT,
                "mistral" | "mistralai" => DEFAULT_MISTRAL_ENDPOINT,
                "anthropic" => DEFAULT_ANTHROPIC_ENDPOINT,
                "openrouter" => DEFAULT_OPENROUTER_ENDPOINT,
                "together" => DEFAULT_TOGETHER_ENDPOINT,
                "deepseek" => DEFAULT_DEEPSEEK_ENDPOINT,
                _ => DEFAULT_OPENAI_ENDPOINT,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// Provider id as configured, lowercased (e.g. "openai", "groq")
    pub provider: String,
    pub kind: ProviderKind,
    pub model: String,
    pub api_key: Secret,
    pub temperature: f32,
    pub max_tokens: u32,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JfrogSettings {
    pub url: String,
    pub access_token: Secret,
    pub mcp_command: String,
    pub mcp_args: Vec<String>,
    pub local_tools: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoralSettings {
    pub sse_url: Url,
    pub agent_id: String,
    pub agent_description: String,
    pub timeout: Duration,
}

impl CoralSettings {
    /// SSE URL with the `agentId` and `agentDescription` query parameters Coral
    /// uses to register the agent in the session.
    pub fn connection_url(&self) -> Url {
        let mut url = self.sse_url.clone();
        url.query_pairs_mut()
            .append_pair("agentId", &self.agent_id)
            .append_pair("agentDescription", &self.agent_description);
        url
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub mode: RuntimeMode,
    pub model: ModelSettings,
    pub jfrog: JfrogSettings,
    pub coral: CoralSettings,
}

impl AgentSettings {
    /// MCP servers the agent binds to, Coral first.
    pub fn servers(&self) -> Vec<ServerConfig> {
        vec![self.coral_server(), self.jfrog_server()]
    }

    pub fn coral_server(&self) -> ServerConfig {
        ServerConfig {
            name: CORAL_SERVER_NAME.to_string(),
            transport: ServerTransport::Sse {
                url: self.coral.connection_url(),
            },
            timeout: self.coral.timeout,
        }
    }

    pub fn jfrog_server(&self) -> ServerConfig {
        let mut env = HashMap::new();
        env.insert(
            crate::constants::JFROG_ACCESS_TOKEN.to_string(),
            self.jfrog.access_token.expose().to_string(),
        );
        env.insert(
            crate::constants::JFROG_URL.to_string(),
            self.jfrog.url.clone(),
        );
        ServerConfig::stdio(
            JFROG_SERVER_NAME,
            PathBuf::from(&self.jfrog.mcp_command),
            self.jfrog.mcp_args.clone(),
            env,
            self.coral.timeout,
        )
    }
}
