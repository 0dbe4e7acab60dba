use super::LlmBackend;
use crate::config::ModelConfig;
use async_trait::async_trait;
use luna_core::{LunaError, LunaResult, Role, Turn};
use serde_json::{json, Value};

/// Harm categories blocked at `BLOCK_MEDIUM_AND_ABOVE`.
const BLOCKED_CATEGORIES: [&str; 2] = ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"];

/// Google Gemini `generateContent` backend.
pub struct GeminiBackend {
    config: ModelConfig,
    api_key: String,
    http: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(config: ModelConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url(),
            self.config.model_id
        )
    }

    fn build_body(&self, system_prompt: Option<&str>, contents: Vec<Value>) -> Value {
        let safety: Vec<Value> = BLOCKED_CATEGORIES
            .iter()
            .map(|c| json!({"category": c, "threshold": "BLOCK_MEDIUM_AND_ABOVE"}))
            .collect();

        let mut body = json!({
            "contents": contents,
            "safetySettings": safety,
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_tokens,
            },
        });

        if let Some(sys) = system_prompt {
            body["systemInstruction"] = json!({"parts": [{"text": sys}]});
        }
        body
    }

    async fn send(&self, body: &Value) -> LunaResult<String> {
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LunaError::Http(e.to_string()))?;

        let status = resp.status();
        let resp_body: Value = resp
            .json()
            .await
            .map_err(|e| LunaError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(LunaError::Http(format!(
                "Gemini API error {status}: {resp_body}"
            )));
        }

        parse_gemini_response(&resp_body)
    }
}

/// Map history turns onto Gemini `contents`; the assistant speaks as `model`.
pub fn build_contents(history: &[Turn], message: &str) -> Vec<Value> {
    history
        .iter()
        .map(|t| {
            json!({
                "role": match t.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                },
                "parts": [{"text": t.content}],
            })
        })
        .chain(std::iter::once(
            json!({"role": "user", "parts": [{"text": message}]}),
        ))
        .collect()
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn chat(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
    ) -> LunaResult<String> {
        let body = self.build_body(Some(system_prompt), build_contents(history, message));
        self.send(&body).await
    }

    async fn generate(&self, prompt: &str) -> LunaResult<String> {
        let body = self.build_body(None, build_contents(&[], prompt));
        self.send(&body).await
    }
}

/// Concatenate the text parts of the first candidate.
///
/// A missing candidate (prompt blocked) or an empty text is an error: the
/// caller has nothing it could show the user.
pub fn parse_gemini_response(body: &Value) -> LunaResult<String> {
    let Some(candidate) = body["candidates"].get(0) else {
        let reason = body["promptFeedback"]["blockReason"]
            .as_str()
            .unwrap_or("no candidates");
        return Err(LunaError::Llm(format!("Gemini returned no reply: {reason}")));
    };

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate["finishReason"].as_str().unwrap_or("empty");
        return Err(LunaError::Llm(format!("Gemini returned empty text: {reason}")));
    }
    Ok(text)
}
