//! Provider factory - creates the model client from settings

use super::clients::{GeminiClient, OllamaClient, OpenAIClient};
use super::traits::ModelProvider;
use crate::config::{ModelSettings, ProviderKind};
use tracing::debug;

/// Factory for creating the model client named by `MODEL_PROVIDER`.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider kind.
    ///
    /// Supported kinds:
    /// - `ollama`, `localai` → Ollama format
    /// - `gemini`, `google`, `google_genai` → Gemini format
    /// - Others → OpenAI-compatible format (default)
    pub fn create(settings: &ModelSettings) -> Box<dyn ModelProvider> {
        debug!(
            provider = settings.provider.as_str(),
            kind = ?settings.kind,
            endpoint = settings.endpoint.as_str(),
            "Creating model client"
        );
        match settings.kind {
            ProviderKind::Ollama => Box::new(OllamaClient::from_settings(settings)),
            ProviderKind::Gemini => Box::new(GeminiClient::from_settings(settings)),
            ProviderKind::OpenAiCompatible => Box::new(OpenAIClient::from_settings(settings)),
        }
    }
}
