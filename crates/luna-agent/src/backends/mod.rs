pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use luna_core::{LunaResult, Turn};

/// Trait for generation backends.
///
/// Each provider implements this trait to handle API communication.
///
/// To add a new provider:
/// 1. Create a new module in `backends/`
/// 2. Implement `LlmBackend` for your struct
/// 3. Add the variant to `LlmProvider` enum in `config.rs`
/// 4. Wire it up in `LlmClient::new()` in `llm.rs`
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Multi-turn completion: `history` is replayed as prior turns in order,
    /// then `message` is sent as the new user turn.
    async fn chat(&self, system_prompt: &str, history: &[Turn], message: &str)
        -> LunaResult<String>;

    /// Single-shot completion from one prompt, with no history.
    async fn generate(&self, prompt: &str) -> LunaResult<String>;
}
