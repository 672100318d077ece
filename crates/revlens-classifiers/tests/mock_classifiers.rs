//! Mock classifiers for testing
//!
//! Configurable implementations of the Classifier trait used to drive the
//! analyzer's fallback policy without a network.

use async_trait::async_trait;
use revlens_classifiers::{Analyzer, Classifier};
use revlens_core::{
    AnalysisKind, AnalysisRequest, AnalysisResult, Error, NounLevel, NounLevelResult, Origin,
    Result, Sentiment, SentimentResult,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A configurable mock classifier for testing
pub struct MockClassifier {
    name: String,
    sentiment: SentimentResult,
    noun_level: NounLevelResult,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockClassifier {
    /// Create a new mock classifier with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sentiment: SentimentResult::neutral(),
            noun_level: NounLevelResult::default(),
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the sentiment this classifier will return
    pub fn with_sentiment(mut self, label: Sentiment, confidence: f32) -> Self {
        self.sentiment = SentimentResult::new(label, confidence);
        self
    }

    /// Set the noun level this classifier will return
    pub fn with_noun_level(mut self, level: NounLevel) -> Self {
        self.noun_level = NounLevelResult::new(level);
        self
    }

    /// Set simulated latency for this classifier
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Get the number of times classify was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(match request.kind {
            AnalysisKind::Sentiment => AnalysisResult::Sentiment(self.sentiment),
            AnalysisKind::NounLevel => AnalysisResult::NounLevel(self.noun_level.clone()),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A classifier that always fails - for testing error paths
pub struct FailingClassifier {
    name: String,
    make_error: fn() -> Error,
    call_count: AtomicU32,
}

impl FailingClassifier {
    /// Create a failing classifier that reports the remote as unavailable
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            make_error: || Error::remote("simulated classifier failure"),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the error returned on every call
    pub fn with_error(mut self, make_error: fn() -> Error) -> Self {
        self.make_error = make_error;
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err((self.make_error)())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

const NEGATIVE_REVIEW: &str =
    "I'm very disappointed with this purchase. The quality is poor and it broke after just one use.";

#[tokio::test]
async fn test_primary_answer_is_remote() {
    let mock = Arc::new(MockClassifier::new("mock").with_sentiment(Sentiment::Positive, 0.97));
    let analyzer = Analyzer::new(mock.clone()).unwrap();

    let analysis = analyzer
        .analyze(&AnalysisRequest::sentiment(NEGATIVE_REVIEW))
        .await
        .unwrap();

    assert_eq!(analysis.origin, Origin::Remote);
    assert_eq!(
        analysis.result,
        AnalysisResult::Sentiment(SentimentResult::new(Sentiment::Positive, 0.97))
    );
    assert_eq!(mock.call_count(), 1);
    assert_eq!(analyzer.primary_name(), "mock");
}

#[tokio::test]
async fn test_primary_noun_level() {
    let mock = Arc::new(MockClassifier::new("mock").with_noun_level(NounLevel::High));
    let analyzer = Analyzer::new(mock).unwrap();

    let analysis = analyzer
        .analyze(&AnalysisRequest::noun_level("short"))
        .await
        .unwrap();

    assert_eq!(
        analysis.result,
        AnalysisResult::NounLevel(NounLevelResult::new(NounLevel::High))
    );
}

#[tokio::test]
async fn test_unavailable_remote_falls_back() {
    let failing = Arc::new(FailingClassifier::new("down"));
    let analyzer = Analyzer::new(failing.clone()).unwrap();

    let analysis = analyzer
        .analyze(&AnalysisRequest::sentiment(NEGATIVE_REVIEW))
        .await
        .unwrap();

    assert_eq!(analysis.origin, Origin::Local);
    let sentiment = analysis.result.as_sentiment().unwrap();
    assert_eq!(sentiment.label, Sentiment::Negative);
    assert!((sentiment.confidence - 0.7).abs() < 1e-6);
    assert_eq!(failing.call_count(), 1);
}

#[tokio::test]
async fn test_fallback_counts_nouns() {
    let analyzer = Analyzer::new(Arc::new(FailingClassifier::new("down"))).unwrap();
    let text = "product ".repeat(16);

    let analysis = analyzer
        .analyze(&AnalysisRequest::noun_level(text))
        .await
        .unwrap();

    assert_eq!(analysis.origin, Origin::Local);
    assert_eq!(
        analysis.result,
        AnalysisResult::NounLevel(NounLevelResult::from_count(16))
    );
}

#[tokio::test]
async fn test_rate_limit_is_surfaced() {
    let failing = FailingClassifier::new("quota").with_error(|| Error::RateLimited {
        status: 429,
        message: "Rate limit reached".to_string(),
    });
    let analyzer = Analyzer::new(Arc::new(failing)).unwrap();

    let err = analyzer
        .analyze(&AnalysisRequest::sentiment("great"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimited { status: 429, .. }));
}

#[tokio::test]
async fn test_unauthorized_is_surfaced() {
    let failing = FailingClassifier::new("auth").with_error(|| Error::Unauthorized {
        status: 401,
        message: "Invalid token".to_string(),
    });
    let analyzer = Analyzer::new(Arc::new(failing)).unwrap();

    let err = analyzer
        .analyze(&AnalysisRequest::noun_level("great"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unauthorized { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_response_uses_default() {
    let failing = FailingClassifier::new("odd").with_error(|| Error::malformed("{}"));
    let analyzer = Analyzer::new(Arc::new(failing)).unwrap();

    let analysis = analyzer
        .analyze(&AnalysisRequest::sentiment(NEGATIVE_REVIEW))
        .await
        .unwrap();

    assert_eq!(analysis.origin, Origin::Remote);
    assert_eq!(
        analysis.result,
        AnalysisResult::Sentiment(SentimentResult::neutral())
    );
}

#[tokio::test]
async fn test_mock_classifier_latency() {
    let classifier = MockClassifier::new("slow").with_latency(Duration::from_millis(10));

    let start = std::time::Instant::now();
    let _ = classifier.classify(&AnalysisRequest::sentiment("test")).await;
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(10));
}
