use luna_core::Turn;
use serde::{Deserialize, Serialize};

/// Summary used for a session that has never been compacted.
pub const DEFAULT_SUMMARY: &str = "New user.";

fn default_summary() -> String {
    DEFAULT_SUMMARY.to_string()
}

/// Durable state of one conversation.
///
/// Persisted as `{ "history": [...], "summary": "...", "summaryCounter": n }`.
/// Missing fields fall back to the defaults of a brand-new session, so a
/// record written by the crisis path (history only) loads cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default)]
    pub summary_counter: u32,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            summary: default_summary(),
            summary_counter: 0,
        }
    }

    /// Append a user turn and the reply to it as one pair.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(Turn::user(user));
        self.history.push(Turn::assistant(assistant));
    }

    /// The most recent `n` history entries (fewer if history is shorter).
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Overwrite the fields present in `patch`, leaving the others alone.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(history) = patch.history {
            self.history = history;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(counter) = patch.summary_counter {
            self.summary_counter = counter;
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial [`SessionRecord`] for merge-style writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub history: Option<Vec<Turn>>,
    pub summary: Option<String>,
    pub summary_counter: Option<u32>,
}

impl SessionPatch {
    /// Replace only the history; summary and counter are left untouched.
    pub fn history(history: Vec<Turn>) -> Self {
        Self {
            history: Some(history),
            ..Self::default()
        }
    }
}

impl From<SessionRecord> for SessionPatch {
    fn from(record: SessionRecord) -> Self {
        Self {
            history: Some(record.history),
            summary: Some(record.summary),
            summary_counter: Some(record.summary_counter),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = SessionRecord::new();
        assert!(record.history.is_empty());
        assert_eq!(record.summary, "New user.");
        assert_eq!(record.summary_counter, 0);
    }

    #[test]
    fn test_persisted_layout_is_camel_case() {
        let mut record = SessionRecord::new();
        record.push_exchange("hello", "hi");
        record.summary_counter = 1;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["summaryCounter"], 1);
        assert_eq!(json["summary"], "New user.");
        assert_eq!(json["history"][0]["role"], "user");
        assert_eq!(json["history"][1]["content"], "hi");
    }

    #[test]
    fn test_history_only_document_loads_with_defaults() {
        let json = r#"{"history":[{"role":"user","content":"x"},{"role":"assistant","content":"y"}]}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.summary, DEFAULT_SUMMARY);
        assert_eq!(record.summary_counter, 0);
    }

    #[test]
    fn test_recent_window() {
        let mut record = SessionRecord::new();
        for i in 0..6 {
            record.push_exchange(format!("u{i}"), format!("a{i}"));
        }
        let window = record.recent(4);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, "u4");
        assert_eq!(window[3].content, "a5");
        assert_eq!(record.recent(100).len(), 12);
    }

    #[test]
    fn test_apply_history_patch_keeps_summary() {
        let mut record = SessionRecord::new();
        record.summary = "Likes tea.".into();
        record.summary_counter = 4;

        record.apply(SessionPatch::history(vec![Turn::user("a"), Turn::assistant("b")]));

        assert_eq!(record.history.len(), 2);
        assert_eq!(record.summary, "Likes tea.");
        assert_eq!(record.summary_counter, 4);
    }

    #[test]
    fn test_full_patch_from_record() {
        let mut source = SessionRecord::new();
        source.summary = "s".into();
        source.summary_counter = 3;
        let patch = SessionPatch::from(source.clone());
        assert_eq!(patch.summary_counter, Some(3));

        let mut target = SessionRecord::new();
        target.apply(patch);
        assert_eq!(target, source);
    }
}
