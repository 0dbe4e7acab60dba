use crate::backends::gemini::GeminiBackend;
use crate::backends::openai::OpenAiBackend;
use crate::backends::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use async_trait::async_trait;
use luna_core::{LunaResult, Turn};
use tracing::debug;

/// LLM client that dispatches to the correct provider backend.
///
/// Uses the `LlmBackend` trait to abstract away provider-specific API differences.
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
}

impl LlmClient {
    /// Build the backend for `config.provider`, resolving its API key once.
    pub fn new(config: ModelConfig) -> LunaResult<Self> {
        let api_key = config.api_key.resolve()?;
        let backend: Box<dyn LlmBackend> = match config.provider {
            LlmProvider::Gemini => Box::new(GeminiBackend::new(config, api_key)),
            LlmProvider::OpenAi | LlmProvider::OpenRouter | LlmProvider::Groq => {
                Box::new(OpenAiBackend::new(config, api_key))
            }
        };
        Ok(Self { backend })
    }

    /// Create from a pre-built backend (for custom/external providers).
    pub fn from_backend(backend: Box<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn chat(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
    ) -> LunaResult<String> {
        debug!(prior_turns = history.len(), "LLM chat request");
        self.backend.chat(system_prompt, history, message).await
    }

    async fn generate(&self, prompt: &str) -> LunaResult<String> {
        debug!(prompt_len = prompt.len(), "LLM generate request");
        self.backend.generate(prompt).await
    }
}
