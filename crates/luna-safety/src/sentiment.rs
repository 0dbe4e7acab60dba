use luna_core::SentimentCategory;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// AFINN-165 word list, one `word<TAB>valence` entry per line, valences in -5..=+5.
const AFINN_165: &str = include_str!("../data/afinn-165.txt");

static AFINN: LazyLock<HashMap<&'static str, i32>> = LazyLock::new(|| parse_lexicon(AFINN_165));

fn parse_lexicon(data: &'static str) -> HashMap<&'static str, i32> {
    data.lines()
        .filter_map(|line| {
            let (word, valence) = line.split_once('\t')?;
            Some((word.trim(), valence.trim().parse().ok()?))
        })
        .collect()
}

/// Tokens that flip the valence of the word that follows them.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "non", "cant", "can't", "dont", "don't", "doesnt", "doesn't",
    "didnt", "didn't", "isnt", "isn't", "wasnt", "wasn't", "wont", "won't", "aint", "ain't",
];

/// Produces a signed polarity score for a message.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> i32;
}

/// Lexicon scorer over the AFINN-165 word list: sums word valences,
/// flipping a word preceded by a negator. The list is parsed once per process.
pub struct LexiconScorer {
    lexicon: &'static HashMap<&'static str, i32>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self { lexicon: &AFINN }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(str::to_lowercase)
        .filter(|w| !w.is_empty())
        .collect()
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> i32 {
        let tokens = tokenize(text);
        tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                let valence = *self.lexicon.get(token.as_str())?;
                let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
                Some(if negated { -valence } else { valence })
            })
            .sum()
    }
}

/// Outcome of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentReading {
    pub score: i32,
    pub category: SentimentCategory,
}

impl SentimentReading {
    pub fn from_score(score: i32) -> Self {
        let category = match score {
            s if s < 0 => SentimentCategory::Negative,
            s if s > 0 => SentimentCategory::Positive,
            _ => SentimentCategory::Neutral,
        };
        Self { score, category }
    }

    /// Tone hint embedded in the persona prompt.
    pub fn hint(&self) -> &'static str {
        match self.category {
            SentimentCategory::Negative => "negative (be gentle)",
            SentimentCategory::Positive => "positive (be cheerful)",
            SentimentCategory::Neutral => "neutral",
        }
    }
}

/// Classifies messages by the sign of a [`SentimentScorer`] score.
#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn SentimentScorer>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(Arc::new(LexiconScorer::default()))
    }
}

impl SentimentClassifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    pub fn classify(&self, text: &str) -> SentimentReading {
        SentimentReading::from_score(self.scorer.score(text))
    }
}
