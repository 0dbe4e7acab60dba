//! Core types and error definitions for the Luna companion backend.
//!
//! This crate provides the foundational types shared across all Luna crates,
//! including error handling, conversation turns, sentiment categories and
//! credential resolution.
//!
//! # Main types
//!
//! - [`LunaError`]: Unified error enum for all Luna subsystems.
//! - [`LunaResult`]: Convenience alias for `Result<T, LunaError>`.
//! - [`Role`]: Turn author (user or assistant).
//! - [`Turn`]: A single entry of a session's conversation history.
//! - [`SentimentCategory`]: Coarse tone tag reported to callers.
//! - [`Credential`]: Inline, environment or file-backed secret.
//! - [`MoodLedger`]: Per-day mood projection derived from sentiment tags.

/// Secret resolution from inline values, environment variables or files.
pub mod credential;
/// Error types.
pub mod error;
/// Conversation turns and sentiment categories.
pub mod message;
/// Daily mood samples derived from reported sentiment.
pub mod mood;

pub use credential::Credential;
pub use error::{LunaError, LunaResult};
pub use message::{Role, SentimentCategory, Turn};
pub use mood::{MoodLedger, MoodLevel, MoodSample};
