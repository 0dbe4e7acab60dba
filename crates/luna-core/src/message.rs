use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of the participant that authored a [`Turn`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human end-user.
    User,
    /// The companion.
    Assistant,
}

/// A single entry of a session's conversation history.
///
/// History is replayed verbatim into every generation request, so the
/// persisted layout is exactly `{ "role": ..., "content": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    /// Who wrote this turn.
    pub role: Role,
    /// The textual content of the turn.
    pub content: String,
}

impl Turn {
    /// Creates a turn with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a turn with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a turn with [`Role::Assistant`].
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Coarse tone tag reported to callers alongside each reply.
///
/// Downstream consumers (the mood ledger) only rely on the words
/// `negative` and `positive` appearing in the tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    /// The message reads as distressed or unhappy.
    Negative,
    /// The message reads as happy or upbeat.
    Positive,
    /// No polarity either way.
    Neutral,
}

impl SentimentCategory {
    /// The wire form of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Negative => "negative",
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_wire_layout() {
        let turn = Turn::assistant("hi there");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "assistant", "content": "hi there"})
        );
    }

    #[test]
    fn test_turn_rejects_unknown_role() {
        let result: Result<Turn, _> =
            serde_json::from_str(r#"{"role":"model","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sentiment_category_wire_form() {
        assert_eq!(
            serde_json::to_string(&SentimentCategory::Negative).unwrap(),
            "\"negative\""
        );
        assert_eq!(SentimentCategory::Positive.to_string(), "positive");
        assert_eq!(SentimentCategory::Neutral.as_str(), "neutral");
    }
}
