#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use luna_core::*;

// ---------------------------------------------------------------------------
// 1. History entries keep the persisted {role, content} layout
// ---------------------------------------------------------------------------

#[test]
fn history_serialization_roundtrip() {
    let history = vec![Turn::user("hello"), Turn::assistant("Hi! How are you?")];

    let json = serde_json::to_string(&history).unwrap();
    assert_eq!(
        json,
        r#"[{"role":"user","content":"hello"},{"role":"assistant","content":"Hi! How are you?"}]"#
    );

    let back: Vec<Turn> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, history);
}

// ---------------------------------------------------------------------------
// 2. Sentiment categories feed the mood ledger
// ---------------------------------------------------------------------------

#[test]
fn sentiment_categories_project_onto_mood_scale() {
    let cases = [
        (SentimentCategory::Negative, MoodLevel::Sad),
        (SentimentCategory::Neutral, MoodLevel::Neutral),
        (SentimentCategory::Positive, MoodLevel::Happy),
    ];
    for (category, level) in cases {
        assert_eq!(MoodLevel::from_sentiment(category.as_str()), level);
    }
}

#[test]
fn mood_ledger_one_sample_per_day() {
    let mut ledger = MoodLedger::default();
    for hour in [1, 5, 9, 13] {
        ledger.record("neutral", Utc.with_ymd_and_hms(2026, 5, 10, hour, 0, 0).unwrap());
    }
    ledger.record("negative", Utc.with_ymd_and_hms(2026, 5, 10, 14, 0, 0).unwrap());

    assert_eq!(ledger.len(), 1);
    let day = ledger.local_day(Utc.with_ymd_and_hms(2026, 5, 10, 14, 0, 0).unwrap());
    assert_eq!(ledger.get(day).unwrap().level, MoodLevel::Sad);
}

// ---------------------------------------------------------------------------
// 3. Error classification
// ---------------------------------------------------------------------------

#[test]
fn error_variants_display() {
    let cases: Vec<(LunaError, &str)> = vec![
        (LunaError::Validation("bad".into()), "Validation error: bad"),
        (LunaError::Session("down".into()), "Session error: down"),
        (LunaError::Llm("empty".into()), "LLM error: empty"),
        (LunaError::Http("refused".into()), "HTTP error: refused"),
        (LunaError::Search("quota".into()), "Search error: quota"),
        (LunaError::Config("missing".into()), "Config error: missing"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn io_and_json_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: LunaError = io.into();
    assert!(matches!(err, LunaError::Io(_)));

    let json_err = serde_json::from_str::<Turn>("{").unwrap_err();
    let err: LunaError = json_err.into();
    assert!(matches!(err, LunaError::Json(_)));
    assert!(!err.is_client_error());
}
