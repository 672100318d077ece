//! revlens Classifiers
//!
//! Sentiment and noun-level classification for product reviews.
//!
//! Two classifiers implement the same [`Classifier`] trait:
//! - [`RemoteClassifier`]: a hosted inference API, with bounded retries and
//!   warm-up handling, whose JSON answers are mapped by [`normalize`]
//! - [`LocalClassifier`]: word-list heuristics that need no network
//!
//! [`Analyzer`] tries the remote one first and falls back to the local one.

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod local;
pub mod normalize;
pub mod nouns;
pub mod remote;
pub mod sentiment;

pub use analyzer::Analyzer;
pub use classifier::Classifier;
pub use config::{InferenceConfig, RequestStyle, RetryPolicy};
pub use local::LocalClassifier;
pub use normalize::{normalize, normalize_noun_level, normalize_sentiment, try_normalize};
pub use nouns::{count_nouns, NounBreakdown, NOUN_SUFFIXES, NOUN_VOCABULARY};
pub use remote::{InferenceClient, RemoteClassifier, NOUN_PROMPT, SENTIMENT_PROMPT};
pub use sentiment::{SentimentCounts, SentimentLexicon, NEGATIVE_WORDS, POSITIVE_WORDS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::Analyzer;
    pub use crate::classifier::Classifier;
    pub use crate::config::InferenceConfig;
    pub use crate::local::LocalClassifier;
    pub use crate::remote::RemoteClassifier;
}
