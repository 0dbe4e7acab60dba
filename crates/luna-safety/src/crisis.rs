use crate::search::{HelplineSearch, OrganicResult};
use luna_core::LunaError;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Phrases that force the safety-escalation path, matched case-insensitively.
pub const CRISIS_PHRASES: [&str; 6] = [
    "suicide",
    "kill myself",
    "end my life",
    "i want to die",
    "going to die",
    "self harm",
];

/// Opening of every safety reply.
pub const CRISIS_PREAMBLE: &str =
    "I hear you. Your life matters. Please reach out for help immediately.\n\n";

/// Helplines used when search enrichment is unavailable.
pub const FALLBACK_HELPLINES: &str = "• Vandrevala Foundation: 9999666555\n• iCALL: 9152987821";

/// What the detector asks the search collaborator for.
#[derive(Debug, Clone)]
pub struct HelplineQuery {
    pub query: String,
    pub location: String,
    pub max_results: usize,
}

impl Default for HelplineQuery {
    fn default() -> Self {
        Self {
            query: "mental health crisis helpline India".to_string(),
            location: "India".to_string(),
            max_results: 3,
        }
    }
}

/// Detects crisis phrases and composes the safety reply.
///
/// Composition never fails: a search error, a timeout or an empty result set
/// all degrade to [`FALLBACK_HELPLINES`].
pub struct CrisisDetector {
    search: Arc<dyn HelplineSearch>,
    query: HelplineQuery,
    timeout: Duration,
}

impl CrisisDetector {
    pub fn new(search: Arc<dyn HelplineSearch>, query: HelplineQuery, timeout: Duration) -> Self {
        Self {
            search,
            query,
            timeout,
        }
    }

    /// True when any crisis phrase occurs anywhere in `message`, ignoring case.
    pub fn is_crisis(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        CRISIS_PHRASES.iter().any(|p| lowered.contains(p))
    }

    /// Build the safety reply: preamble plus helpline listings.
    pub async fn compose_reply(&self) -> String {
        let mut reply = String::from(CRISIS_PREAMBLE);
        match self.enrichment().await {
            Some(lines) => reply.push_str(&lines),
            None => reply.push_str(FALLBACK_HELPLINES),
        }
        reply
    }

    async fn enrichment(&self) -> Option<String> {
        let lookup = self.search.search(&self.query.query, &self.query.location);
        let results = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                warn!(error = %e, "helpline search failed, using fallback list");
                return None;
            }
            Err(_) => {
                let e = LunaError::timeout("helpline search", self.timeout);
                warn!(error = %e, "helpline search timed out, using fallback list");
                return None;
            }
        };

        let lines = format_results(&results, self.query.max_results);
        if lines.is_empty() {
            debug!("helpline search returned no usable results");
            return None;
        }
        Some(lines)
    }
}

/// Render up to `limit` complete results as `• title: snippet` lines.
fn format_results(results: &[OrganicResult], limit: usize) -> String {
    let mut out = String::new();
    let complete = results.iter().filter_map(|r| match (&r.title, &r.snippet) {
        (Some(t), Some(s)) if !t.trim().is_empty() && !s.trim().is_empty() => Some((t, s)),
        _ => None,
    });
    for (title, snippet) in complete.take(limit) {
        let _ = writeln!(out, "• {title}: {snippet}");
    }
    out
}
