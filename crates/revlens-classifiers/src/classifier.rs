//! Classifier trait

use async_trait::async_trait;
use revlens_core::{AnalysisRequest, AnalysisResult, Result};

/// Trait for all classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the request's text for the request's kind
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
