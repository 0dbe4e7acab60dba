use super::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use async_trait::async_trait;
use luna_core::{LunaError, LunaResult, Role, Turn};

/// OpenAI-compatible API backend.
///
/// Works with OpenAI, OpenRouter, Groq, Ollama, and any other provider
/// that implements the OpenAI chat completions API.
pub struct OpenAiBackend {
    config: ModelConfig,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: ModelConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        // OpenRouter requires extra headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request
                .header("HTTP-Referer", "https://github.com/luna-companion/luna")
                .header("X-Title", "Luna")
        } else {
            request
        }
    }

    async fn complete(&self, api_messages: Vec<serde_json::Value>) -> LunaResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let body = serde_json::json!({
            "model": self.config.model_id,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": api_messages,
        });

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LunaError::Http(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LunaError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(LunaError::Http(format!(
                "OpenAI API error {status}: {resp_body}"
            )));
        }

        parse_openai_response(&resp_body)
    }
}

pub fn build_messages(
    system_prompt: Option<&str>,
    history: &[Turn],
    message: &str,
) -> Vec<serde_json::Value> {
    let mut api_messages: Vec<serde_json::Value> = Vec::with_capacity(history.len() + 2);

    if let Some(sys) = system_prompt {
        api_messages.push(serde_json::json!({
            "role": "system",
            "content": sys
        }));
    }

    for t in history {
        api_messages.push(serde_json::json!({
            "role": match t.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            "content": t.content
        }));
    }

    api_messages.push(serde_json::json!({
        "role": "user",
        "content": message
    }));

    api_messages
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn chat(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
    ) -> LunaResult<String> {
        self.complete(build_messages(Some(system_prompt), history, message))
            .await
    }

    async fn generate(&self, prompt: &str) -> LunaResult<String> {
        self.complete(build_messages(None, &[], prompt)).await
    }
}

pub fn parse_openai_response(body: &serde_json::Value) -> LunaResult<String> {
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default();

    if content.trim().is_empty() {
        let finish_reason = body["choices"][0]["finish_reason"]
            .as_str()
            .unwrap_or("missing");
        return Err(LunaError::Llm(format!(
            "OpenAI returned empty content (finish_reason: {finish_reason})"
        )));
    }
    Ok(content.to_string())
}
