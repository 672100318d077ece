//! Lexicon-based sentiment scoring
//!
//! Used when the hosted model is unreachable. Counts whole-word hits from two
//! fixed word lists; the larger count wins and a tie is neutral.

use aho_corasick::{AhoCorasick, MatchKind};
use revlens_core::{Error, Result, Sentiment, SentimentResult, DEFAULT_CONFIDENCE};

/// Words that indicate a favourable review
pub const POSITIVE_WORDS: &[&str] = &[
    "amazing",
    "awesome",
    "best",
    "brilliant",
    "delicious",
    "excellent",
    "exceptional",
    "fantastic",
    "good",
    "great",
    "love",
    "outstanding",
    "perfect",
    "recommend",
    "refreshing",
    "wonderful",
];

/// Words that indicate an unfavourable review
pub const NEGATIVE_WORDS: &[&str] = &[
    "awful",
    "bad",
    "broken",
    "damaged",
    "disappointed",
    "gross",
    "harsh",
    "hate",
    "horrible",
    "mediocre",
    "poor",
    "refused",
    "regret",
    "terrible",
    "useless",
    "waste",
    "worst",
];

/// Confidence added per winning hit
const CONFIDENCE_STEP: f32 = 0.1;

/// Upper bound on lexicon confidence
const MAX_LEXICON_CONFIDENCE: f32 = 0.9;

/// Hit counts for one text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
}

pub struct SentimentLexicon {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl SentimentLexicon {
    /// Lexicon over [`POSITIVE_WORDS`] and [`NEGATIVE_WORDS`]
    pub fn new() -> Result<Self> {
        Self::with_words(POSITIVE_WORDS, NEGATIVE_WORDS)
    }

    pub fn with_words(positive: &[&str], negative: &[&str]) -> Result<Self> {
        Ok(Self {
            positive: build_matcher(positive, "positive")?,
            negative: build_matcher(negative, "negative")?,
        })
    }

    /// Count whole-word, case-insensitive hits from each list
    pub fn count(&self, text: &str) -> SentimentCounts {
        SentimentCounts {
            positive: count_whole_words(&self.positive, text),
            negative: count_whole_words(&self.negative, text),
        }
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        let counts = self.count(text);

        if counts.positive > counts.negative {
            SentimentResult::new(Sentiment::Positive, lexicon_confidence(counts.positive))
        } else if counts.negative > counts.positive {
            SentimentResult::new(Sentiment::Negative, lexicon_confidence(counts.negative))
        } else {
            SentimentResult::new(Sentiment::Neutral, DEFAULT_CONFIDENCE)
        }
    }
}

fn build_matcher(words: &[&str], list: &str) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(words)
        .map_err(|e| Error::config(format!("Failed to build {list} sentiment matcher: {e}")))
}

fn lexicon_confidence(hits: usize) -> f32 {
    (DEFAULT_CONFIDENCE + hits as f32 * CONFIDENCE_STEP).min(MAX_LEXICON_CONFIDENCE)
}

fn count_whole_words(matcher: &AhoCorasick, text: &str) -> usize {
    let bytes = text.as_bytes();
    matcher
        .find_iter(text)
        .filter(|m| {
            let before = m.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(m.end()).copied();
            !before.is_some_and(is_word_byte) && !after.is_some_and(is_word_byte)
        })
        .count()
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
