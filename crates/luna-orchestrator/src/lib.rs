//! Conversation orchestration for the Luna companion.
//!
//! Composes sanitization, crisis escalation, sentiment classification,
//! generation and memory compaction into a single per-turn operation that is
//! serialized per session identifier.
//!
//! # Main types
//!
//! - [`ConversationOrchestrator`]: Runs one chat turn end to end.
//! - [`MemoryCompactor`]: Rolls recent turns into the session summary.
//! - [`OrchestratorConfig`]: Compaction threshold and collaborator timeouts.

/// Memory compaction.
pub mod compactor;
mod deadline;
/// Turn orchestration.
pub mod orchestrator;
/// Persona and summarizer prompt builders.
pub mod prompt;

pub use compactor::MemoryCompactor;
pub use orchestrator::{ChatOutcome, ConversationOrchestrator, OrchestratorConfig, MISSING_FIELDS};
