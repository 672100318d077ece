//! Configuration for the hosted inference API

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How review text is turned into the request's `inputs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStyle {
    /// Send the review text as-is (classification / token-classification models)
    #[default]
    Direct,
    /// Wrap the review in an instruction for a text-generation model
    Prompt,
}

/// Hosted inference settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL; the model id is appended as a path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for sentiment
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    /// Model used for noun level
    #[serde(default = "default_noun_model")]
    pub noun_model: String,

    #[serde(default)]
    pub sentiment_style: RequestStyle,

    #[serde(default)]
    pub noun_style: RequestStyle,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between retries
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Warm-up waits allowed per call; these do not consume retries
    #[serde(default = "default_max_warmups")]
    pub max_warmups: u32,

    /// Cap on a single server-requested warm-up wait
    #[serde(default = "default_max_warmup_wait_secs")]
    pub max_warmup_wait_secs: f64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sentiment_model: default_sentiment_model(),
            noun_model: default_noun_model(),
            sentiment_style: RequestStyle::Direct,
            noun_style: RequestStyle::Direct,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            max_warmups: default_max_warmups(),
            max_warmup_wait_secs: default_max_warmup_wait_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InferenceConfig {
    /// Retry settings derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
            max_warmups: self.max_warmups,
            max_warmup_wait: Duration::try_from_secs_f64(self.max_warmup_wait_secs.max(0.0))
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bounded retry behaviour for one remote call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
    pub max_warmups: u32,
    pub max_warmup_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        InferenceConfig::default().retry_policy()
    }
}

impl RetryPolicy {
    /// Clamp a server-supplied `estimated_time` (seconds) to the cap.
    ///
    /// Returns `None` for negative or non-finite values.
    pub fn warmup_wait(&self, estimated_secs: f64) -> Option<Duration> {
        if !estimated_secs.is_finite() || estimated_secs < 0.0 {
            return None;
        }
        let wait = Duration::try_from_secs_f64(estimated_secs).unwrap_or(Duration::MAX);
        Some(wait.min(self.max_warmup_wait))
    }
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_sentiment_model() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_noun_model() -> String {
    "vblagoje/bert-english-uncased-finetuned-pos".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    2_000
}

fn default_max_warmups() -> u32 {
    3
}

fn default_max_warmup_wait_secs() -> f64 {
    30.0
}

fn default_timeout_secs() -> u64 {
    30
}
