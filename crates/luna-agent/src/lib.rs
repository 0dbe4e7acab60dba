//! Generation collaborators for the Luna companion.
//!
//! Everything that talks to a language model sits behind [`LlmBackend`]:
//! a multi-turn `chat` used for replies and a single-shot `generate` used
//! for memory compaction. [`LlmClient`] picks the backend from
//! [`ModelConfig`].

pub mod backends;
pub mod config;
pub mod llm;

pub use backends::LlmBackend;
pub use config::{LlmProvider, ModelConfig};
pub use llm::LlmClient;
