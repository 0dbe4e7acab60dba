use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// UTC offset (+05:30) the companion app buckets days in by default.
const DEFAULT_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Three-level mood scale shown on the mood chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLevel {
    /// Derived from a `negative` tag.
    Sad = 1,
    /// Anything that is neither negative nor positive.
    Neutral = 2,
    /// Derived from a `positive` tag.
    Happy = 3,
}

impl MoodLevel {
    /// Map a reported sentiment tag onto the scale.
    ///
    /// Matching is by containment so a tag carrying a guidance suffix
    /// (`"negative (be gentle)"`) maps the same as the bare category.
    pub fn from_sentiment(tag: &str) -> Self {
        if tag.contains("negative") {
            MoodLevel::Sad
        } else if tag.contains("positive") {
            MoodLevel::Happy
        } else {
            MoodLevel::Neutral
        }
    }

    /// Numeric value on the 1..=3 chart axis.
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// One mood observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSample {
    pub level: MoodLevel,
    pub recorded_at: DateTime<Utc>,
}

/// At most one [`MoodSample`] per local calendar day; the latest write wins.
#[derive(Debug, Clone)]
pub struct MoodLedger {
    offset: FixedOffset,
    samples: BTreeMap<NaiveDate, MoodSample>,
}

impl MoodLedger {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            samples: BTreeMap::new(),
        }
    }

    /// Record the sentiment tag of a reply observed at `at`, replacing any
    /// earlier sample for the same local day.
    pub fn record(&mut self, sentiment: &str, at: DateTime<Utc>) -> MoodLevel {
        let level = MoodLevel::from_sentiment(sentiment);
        let day = self.local_day(at);
        self.samples.insert(
            day,
            MoodSample {
                level,
                recorded_at: at,
            },
        );
        level
    }

    pub fn get(&self, day: NaiveDate) -> Option<&MoodSample> {
        self.samples.get(&day)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The `n` days ending at `today`, oldest first, with `None` for days
    /// that have no sample.
    pub fn last_days(&self, today: NaiveDate, n: usize) -> Vec<(NaiveDate, Option<MoodLevel>)> {
        (0..n)
            .rev()
            .map(|back| {
                let day = today - Duration::days(back as i64);
                (day, self.samples.get(&day).map(|s| s.level))
            })
            .collect()
    }

    /// The calendar day `at` falls on in this ledger's offset.
    pub fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

impl Default for MoodLedger {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        Self::new(offset)
    }
}
