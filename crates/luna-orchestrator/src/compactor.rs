use crate::deadline::bounded;
use crate::prompt::summarizer_prompt;
use luna_agent::LlmBackend;
use luna_core::LunaResult;
use luna_session::SessionRecord;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Number of normal turns between compactions.
pub const DEFAULT_SUMMARY_THRESHOLD: u32 = 10;

/// Rolls the most recent turns into the session summary every `threshold` turns.
///
/// Only the last `threshold` history entries are sent to the model; earlier
/// history is never re-summarized.
pub struct MemoryCompactor {
    llm: Arc<dyn LlmBackend>,
    threshold: u32,
    timeout: Duration,
}

impl MemoryCompactor {
    pub fn new(llm: Arc<dyn LlmBackend>, threshold: u32, timeout: Duration) -> Self {
        Self {
            llm,
            threshold: threshold.max(1),
            timeout,
        }
    }

    /// Count one normal turn and compact if the threshold is reached.
    ///
    /// Call after the exchange has been appended. Returns `true` when the
    /// summary was replaced. On error `record` is left untouched.
    pub async fn advance(&self, record: &mut SessionRecord) -> LunaResult<bool> {
        let counter = record.summary_counter.saturating_add(1);
        if counter < self.threshold {
            record.summary_counter = counter;
            return Ok(false);
        }

        let prompt = summarizer_prompt(record.recent(self.threshold as usize))?;
        let summary = bounded("llm", self.timeout, self.llm.generate(&prompt)).await?;

        record.summary = summary.trim().to_string();
        record.summary_counter = 0;
        info!(
            history_len = record.history.len(),
            summary_len = record.summary.len(),
            "Session memory compacted"
        );
        Ok(true)
    }
}
