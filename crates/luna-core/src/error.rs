use std::time::Duration;
use thiserror::Error;

/// A convenience `Result` alias using [`LunaError`].
pub type LunaResult<T> = Result<T, LunaError>;

/// Top-level error type for the Luna backend.
///
/// Each variant corresponds to a subsystem or collaborator that can fail.
/// Only [`LunaError::Validation`] is caused by the caller; everything else is
/// an upstream failure whose detail must stay out of HTTP responses.
#[derive(Error, Debug)]
pub enum LunaError {
    /// The request is missing required fields or carries unusable content.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The durable session store failed.
    #[error("Session error: {0}")]
    Session(String),

    /// The generation collaborator failed or returned an unusable reply.
    #[error("LLM error: {0}")]
    Llm(String),

    /// An outbound HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The helpline search collaborator failed.
    #[error("Search error: {0}")]
    Search(String),

    /// A collaborator call did not finish in time.
    #[error("{collaborator} timed out after {after_ms}ms")]
    Timeout {
        /// Which collaborator was being called.
        collaborator: String,
        /// The bound that was exceeded.
        after_ms: u64,
    },

    /// Configuration could not be parsed or resolved.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LunaError {
    /// A [`LunaError::Timeout`] for `collaborator` after `after` elapsed.
    /// Bounds too large for a `u64` of milliseconds saturate.
    pub fn timeout(collaborator: impl Into<String>, after: Duration) -> Self {
        LunaError::Timeout {
            collaborator: collaborator.into(),
            after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns true when the error was caused by the request itself and
    /// should be reported as a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LunaError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(LunaError::Validation("missing".into()).is_client_error());
        assert!(!LunaError::Session("down".into()).is_client_error());
        assert!(!LunaError::Llm("blocked".into()).is_client_error());
        assert!(!LunaError::Timeout {
            collaborator: "llm".into(),
            after_ms: 10,
        }
        .is_client_error());
    }

    #[test]
    fn test_timeout_from_duration() {
        let err = LunaError::timeout("llm", Duration::from_millis(250));
        assert!(
            matches!(err, LunaError::Timeout { ref collaborator, after_ms: 250 } if collaborator == "llm")
        );

        let err = LunaError::timeout("search", Duration::MAX);
        assert!(matches!(err, LunaError::Timeout { after_ms: u64::MAX, .. }));
    }

    #[test]
    fn test_timeout_display() {
        let err = LunaError::Timeout {
            collaborator: "search".into(),
            after_ms: 1500,
        };
        assert_eq!(err.to_string(), "search timed out after 1500ms");
    }
}
