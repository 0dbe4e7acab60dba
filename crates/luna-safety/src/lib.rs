//! Safety and tone primitives for the Luna companion.
//!
//! Provides input sanitization, message sentiment scoring, crisis-phrase
//! detection with helpline escalation, and the helpline search collaborator.
//!
//! # Main types
//!
//! - [`Sanitizer`]: Drops stray control characters and refuses oversized messages.
//! - [`SentimentClassifier`]: Maps a polarity score to a category and prompt hint.
//! - [`LexiconScorer`]: AFINN-165 word-valence scorer with negation handling.
//! - [`CrisisDetector`]: Crisis-phrase scan and safety reply composition.
//! - [`HelplineSearch`]: Search collaborator used to enrich safety replies.

/// Crisis-phrase detection and safety reply composition.
pub mod crisis;
/// Chat message clean-up.
pub mod sanitizer;
/// Helpline search collaborator.
pub mod search;
/// Sentiment scoring and tone hints.
pub mod sentiment;

pub use crisis::{CrisisDetector, HelplineQuery, CRISIS_PREAMBLE, FALLBACK_HELPLINES};
pub use sanitizer::{Sanitizer, DEFAULT_MAX_MESSAGE_LENGTH};
pub use search::{HelplineSearch, OrganicResult, SerpApiSearch, UnconfiguredSearch};
pub use sentiment::{LexiconScorer, SentimentClassifier, SentimentReading, SentimentScorer};
