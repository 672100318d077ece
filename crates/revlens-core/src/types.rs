//! Core types for revlens

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence reported when nothing better is known
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Smallest noun count bucketed as [`NounLevel::Medium`]
pub const MEDIUM_MIN_NOUNS: usize = 6;

/// Largest noun count bucketed as [`NounLevel::Medium`]
pub const MEDIUM_MAX_NOUNS: usize = 15;

/// A single product review
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Review(String);

impl Review {
    /// Create a review from its text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The review text
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Review {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Review {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// What to ask of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    Sentiment,
    NounLevel,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::NounLevel => "noun-level",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sentiment" => Ok(Self::Sentiment),
            "noun-level" | "nouns" | "noun_level" => Ok(Self::NounLevel),
            other => Err(format!("unknown analysis kind: {other}")),
        }
    }
}

/// A piece of text paired with the analysis to run on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub kind: AnalysisKind,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, kind: AnalysisKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn sentiment(text: impl Into<String>) -> Self {
        Self::new(text, AnalysisKind::Sentiment)
    }

    pub fn noun_level(text: impl Into<String>) -> Self {
        Self::new(text, AnalysisKind::NounLevel)
    }
}

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment label with a confidence in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: Sentiment,
    pub confidence: f32,
}

impl SentimentResult {
    /// Create a result, clamping the confidence into `[0, 1]`.
    ///
    /// A NaN confidence becomes [`DEFAULT_CONFIDENCE`].
    pub fn new(label: Sentiment, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            DEFAULT_CONFIDENCE
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }

    /// Neutral at the default confidence
    pub fn neutral() -> Self {
        Self::new(Sentiment::Neutral, DEFAULT_CONFIDENCE)
    }
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Coarse noun-count bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NounLevel {
    /// Fewer than 6 nouns
    #[default]
    Low,
    /// 6 to 15 nouns inclusive
    Medium,
    /// More than 15 nouns
    High,
}

impl NounLevel {
    /// Bucket a raw noun count
    pub fn from_count(count: usize) -> Self {
        if count > MEDIUM_MAX_NOUNS {
            Self::High
        } else if count >= MEDIUM_MIN_NOUNS {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for NounLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Noun level, with the underlying count when one was measured
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NounLevelResult {
    pub level: NounLevel,

    /// `None` when a generative model only named the bucket
    pub count: Option<usize>,

    /// Per-word tally, most frequent first; empty unless part-of-speech
    /// tokens were available
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<(String, usize)>,
}

impl NounLevelResult {
    /// Result for a bucket with no known count
    pub fn new(level: NounLevel) -> Self {
        Self {
            level,
            count: None,
            words: Vec::new(),
        }
    }

    /// Result derived from a measured count
    pub fn from_count(count: usize) -> Self {
        Self {
            level: NounLevel::from_count(count),
            count: Some(count),
            words: Vec::new(),
        }
    }

    /// Attach the per-word tally behind the count
    pub fn with_words(mut self, words: Vec<(String, usize)>) -> Self {
        self.words = words;
        self
    }
}

/// Normalized outcome of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AnalysisResult {
    Sentiment(SentimentResult),
    NounLevel(NounLevelResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::Sentiment(_) => AnalysisKind::Sentiment,
            Self::NounLevel(_) => AnalysisKind::NounLevel,
        }
    }

    /// The default answer for a kind when nothing could be recognized
    pub fn default_for(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Sentiment => Self::Sentiment(SentimentResult::neutral()),
            AnalysisKind::NounLevel => Self::NounLevel(NounLevelResult::default()),
        }
    }

    pub fn as_sentiment(&self) -> Option<&SentimentResult> {
        match self {
            Self::Sentiment(result) => Some(result),
            Self::NounLevel(_) => None,
        }
    }

    pub fn as_noun_level(&self) -> Option<&NounLevelResult> {
        match self {
            Self::NounLevel(result) => Some(result),
            Self::Sentiment(_) => None,
        }
    }
}

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Hosted inference API
    Remote,
    /// Local fallback heuristic
    Local,
}

/// An analysis result tagged with its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub origin: Origin,
}

impl Analysis {
    pub fn remote(result: AnalysisResult) -> Self {
        Self {
            result,
            origin: Origin::Remote,
        }
    }

    pub fn local(result: AnalysisResult) -> Self {
        Self {
            result,
            origin: Origin::Local,
        }
    }
}
