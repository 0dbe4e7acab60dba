use crate::compactor::{MemoryCompactor, DEFAULT_SUMMARY_THRESHOLD};
use crate::deadline::bounded;
use crate::prompt::persona_prompt;
use luna_agent::LlmBackend;
use luna_core::{LunaError, LunaResult, SentimentCategory, Turn};
use luna_safety::{CrisisDetector, Sanitizer, SentimentClassifier};
use luna_session::{SessionLocks, SessionPatch, SessionRecord, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Message reported for a missing session identifier or message.
pub const MISSING_FIELDS: &str = "sessionId and message are required.";

/// Tunables for [`ConversationOrchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub summary_threshold: u32,
    pub llm_timeout: Duration,
    pub store_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
            llm_timeout: Duration::from_secs(30),
            store_timeout: Duration::from_secs(10),
        }
    }
}

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub reply: String,
    pub sentiment: SentimentCategory,
    /// True when the turn took the safety-escalation path.
    pub escalated: bool,
}

/// Runs chat turns: validate, crisis check, load, classify, generate,
/// update and compact, persist.
///
/// Turns on the same session identifier are serialized in arrival order.
/// A failure on the normal path never writes a partial record.
pub struct ConversationOrchestrator {
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn LlmBackend>,
    crisis: CrisisDetector,
    classifier: SentimentClassifier,
    sanitizer: Sanitizer,
    compactor: MemoryCompactor,
    locks: SessionLocks,
    config: OrchestratorConfig,
}

impl ConversationOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn LlmBackend>,
        crisis: CrisisDetector,
        config: OrchestratorConfig,
    ) -> Self {
        let compactor =
            MemoryCompactor::new(llm.clone(), config.summary_threshold, config.llm_timeout);
        Self {
            store,
            llm,
            crisis,
            classifier: SentimentClassifier::default(),
            sanitizer: Sanitizer::default(),
            compactor,
            locks: SessionLocks::new(),
            config,
        }
    }

    pub fn with_classifier(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Handle one chat turn for `session_id`.
    ///
    /// Returns [`LunaError::Validation`] without touching the store when
    /// either field is blank or the message is refused by the sanitizer.
    pub async fn handle(&self, session_id: &str, message: &str) -> LunaResult<ChatOutcome> {
        let message = self.validate(session_id, message)?;
        let _turn = self.locks.acquire(session_id).await;

        if self.crisis.is_crisis(&message) {
            return Ok(self.escalate(session_id, message).await);
        }
        self.converse(session_id, message).await
    }

    fn validate(&self, session_id: &str, message: &str) -> LunaResult<String> {
        if session_id.trim().is_empty() || message.trim().is_empty() {
            return Err(LunaError::Validation(MISSING_FIELDS.to_string()));
        }
        let message = self.sanitizer.clean(message)?;
        if message.trim().is_empty() {
            return Err(LunaError::Validation(MISSING_FIELDS.to_string()));
        }
        Ok(message)
    }

    /// Safety path. Never fails: persistence is best effort and the reply
    /// is returned regardless.
    async fn escalate(&self, session_id: &str, message: String) -> ChatOutcome {
        warn!(session_id = %session_id, "Crisis phrase detected, escalating");
        let reply = self.crisis.compose_reply().await;

        match self.load(session_id).await {
            Ok(existing) => {
                let mut history = existing.map(|r| r.history).unwrap_or_default();
                history.push(Turn::user(message));
                history.push(Turn::assistant(reply.clone()));
                if let Err(e) = self.save(session_id, SessionPatch::history(history)).await {
                    warn!(session_id = %session_id, error = %e, "Failed to persist crisis turn");
                }
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Skipping crisis turn persistence, session unreadable");
            }
        }

        ChatOutcome {
            reply,
            sentiment: SentimentCategory::Negative,
            escalated: true,
        }
    }

    async fn converse(&self, session_id: &str, message: String) -> LunaResult<ChatOutcome> {
        let mut record = self.load(session_id).await?.unwrap_or_default();

        let reading = self.classifier.classify(&message);
        debug!(session_id = %session_id, score = reading.score, "Message classified");

        let system_prompt = persona_prompt(&record.summary, reading.hint());
        let reply = bounded(
            "llm",
            self.config.llm_timeout,
            self.llm.chat(&system_prompt, &record.history, &message),
        )
        .await?;

        record.push_exchange(message, reply.clone());
        let compacted = self.compactor.advance(&mut record).await?;

        let history_len = record.history.len();
        self.save(session_id, SessionPatch::from(record)).await?;

        info!(
            session_id = %session_id,
            history_len,
            compacted,
            sentiment = %reading.category,
            "Chat turn complete"
        );
        Ok(ChatOutcome {
            reply,
            sentiment: reading.category,
            escalated: false,
        })
    }

    async fn load(&self, session_id: &str) -> LunaResult<Option<SessionRecord>> {
        bounded(
            "session store",
            self.config.store_timeout,
            self.store.get(session_id),
        )
        .await
    }

    /// Persist `patch`. Only the read side is time-bounded: a write that
    /// outlives `store_timeout` is awaited until it lands, with the session
    /// lock still held, so the reported outcome matches what was persisted.
    async fn save(&self, session_id: &str, patch: SessionPatch) -> LunaResult<()> {
        let store = self.store.clone();
        let key = session_id.to_string();
        let mut write = tokio::spawn(async move { store.merge_set(&key, patch).await });

        let joined = match tokio::time::timeout(self.config.store_timeout, &mut write).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(
                    session_id = %session_id,
                    deadline = ?self.config.store_timeout,
                    "Session write is slow, waiting for it to finish"
                );
                write.await
            }
        };
        joined.map_err(|e| LunaError::Session(format!("Session write task failed: {e}")))?
    }
}
